//! Directory-prefix classification of source files.

use serde::{Deserialize, Serialize};

use crate::model::{Category, SourcePath};

/// Maps a leading directory segment to a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Directory name to match, without slashes (e.g. `Models`).
    pub prefix: String,
    pub category: Category,
}

impl CategoryRule {
    pub fn new(prefix: impl Into<String>, category: Category) -> Self {
        Self { prefix: prefix.into(), category }
    }

    fn matches(&self, path: &SourcePath) -> bool {
        let prefix = self.prefix.trim_matches('/');
        !prefix.is_empty() && path.leading_component() == Some(prefix)
    }
}

/// Ordered rule table. The first matching rule wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Classifier {
    rules: Vec<CategoryRule>,
}

impl Classifier {
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Classify `path`. Never fails; unmatched paths are `Uncategorized`.
    pub fn classify(&self, path: &SourcePath) -> Category {
        self.rules
            .iter()
            .find(|rule| rule.matches(path))
            .map(|rule| rule.category)
            .unwrap_or(Category::Uncategorized)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(vec![
            CategoryRule::new("Models", Category::Model),
            CategoryRule::new("Views", Category::View),
            CategoryRule::new("ViewModels", Category::ViewModel),
            CategoryRule::new("Services", Category::Service),
            CategoryRule::new("Utilities", Category::Utility),
            CategoryRule::new("CoreData", Category::PersistenceLayer),
        ])
    }
}
