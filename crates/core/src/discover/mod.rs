//! Enumeration of candidate source files under a project root.

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::model::SourcePath;

/// What counts as a source file during discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryOptions {
    /// File extension to collect, without the dot.
    pub extension: String,
    /// Directory names that are never descended into (build output).
    pub exclude_dirs: Vec<String>,
    /// File names that are never collected (manifest-defining files).
    pub exclude_files: Vec<String>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            extension: "swift".to_string(),
            exclude_dirs: vec![".build".to_string()],
            exclude_files: vec!["Package.swift".to_string()],
        }
    }
}

/// Walks a project tree and collects source files.
#[derive(Debug, Clone)]
pub struct FileDiscoverer<'a> {
    options: &'a DiscoveryOptions,
}

impl<'a> FileDiscoverer<'a> {
    pub fn new(options: &'a DiscoveryOptions) -> Self {
        Self { options }
    }

    /// Collect source files under `root`, relative to it and sorted by path.
    ///
    /// Any I/O error while walking aborts discovery.
    pub fn discover(&self, root: &Path) -> Result<Vec<SourcePath>, walkdir::Error> {
        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_pruned_dir(entry));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() || !self.is_candidate(entry.path()) {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let path = to_source_path(relative);
            debug!(path = %path, "discovered source file");
            files.push(path);
        }

        files.sort();
        info!(count = files.len(), root = %root.display(), "discovered source files");
        Ok(files)
    }

    fn is_pruned_dir(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        name.starts_with('.') || self.options.exclude_dirs.iter().any(|d| d.as_str() == name)
    }

    fn is_candidate(&self, path: &Path) -> bool {
        let file_name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        if self.options.exclude_files.iter().any(|f| f.as_str() == file_name) {
            return false;
        }
        let wanted = self.options.extension.trim_start_matches('.');
        path.extension().and_then(|e| e.to_str()) == Some(wanted)
    }
}

/// Join the normal components of `relative` with `/`.
fn to_source_path(relative: &Path) -> SourcePath {
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    SourcePath::new(parts.join("/"))
}
