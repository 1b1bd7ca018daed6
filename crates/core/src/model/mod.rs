//! Core data model for files that are about to be registered in a manifest.
//!
//! - `SourcePath`: a relative, `/`-separated path to a source file.
//! - `Category`: the logical group a file belongs to.
//! - `Entry`: one newly discovered file with its identifiers and category.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ident::Identifier;

/// Relative path of a source file inside the project tree.
///
/// Always uses `/` as the separator regardless of host platform, because that
/// is what the manifest stores.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourcePath(String);

impl SourcePath {
    pub fn new(path: impl Into<String>) -> Self {
        let raw: String = path.into();
        let normalized = raw.replace('\\', "/");
        let trimmed = normalized.strip_prefix("./").unwrap_or(&normalized);
        Self(trimmed.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path component (`Truck.swift` for `Models/Truck.swift`).
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// First directory segment, or `None` for files at the project root.
    pub fn leading_component(&self) -> Option<&str> {
        self.0.split_once('/').map(|(head, _)| head)
    }
}

impl fmt::Display for SourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Logical group a source file is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Model,
    View,
    ViewModel,
    Service,
    Utility,
    PersistenceLayer,
    Uncategorized,
}

impl Category {
    /// Categories that own a group block, in the order the patcher visits them.
    pub const GROUPED: [Category; 6] = [
        Category::Model,
        Category::View,
        Category::ViewModel,
        Category::Service,
        Category::Utility,
        Category::PersistenceLayer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Model => "model",
            Category::View => "view",
            Category::ViewModel => "view_model",
            Category::Service => "service",
            Category::Utility => "utility",
            Category::PersistenceLayer => "persistence_layer",
            Category::Uncategorized => "uncategorized",
        }
    }

    pub fn is_grouped(&self) -> bool {
        !matches!(self, Category::Uncategorized)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One newly discovered file, ready to be rendered into fragments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Identifier of the file's declaration.
    pub id: Identifier,
    /// Identifier of the file's build association.
    pub build_id: Identifier,
    pub path: SourcePath,
    pub category: Category,
}

impl Entry {
    pub fn new(path: SourcePath, category: Category) -> Self {
        let id = Identifier::for_path(&path);
        let build_id = Identifier::for_build(&path);
        Self { id, build_id, path, category }
    }
}
