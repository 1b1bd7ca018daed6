use serde::{Deserialize, Serialize};

use crate::classify::{CategoryRule, Classifier};
use crate::discover::DiscoveryOptions;
use crate::format::DEFAULT_FILE_TYPE;
use crate::patch::AnchorMap;

/// Current config format version.
pub const CONFIG_VERSION: &str = "0.1.0";

/// Serializable configuration for a sync run.
///
/// Lives (by default) at `.pbxsync/config.json`. Every field has a default, so a
/// partial file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Schema/config version. This is about the config format, not the tool.
    pub config_version: String,
    /// Manifest path, typically relative to the project root.
    pub manifest: String,
    /// Files the manifest is known to track already.
    pub known_files: Vec<String>,
    pub discovery: DiscoveryOptions,
    /// `lastKnownFileType` written into declarations.
    pub file_type: String,
    /// Ordered directory-prefix rules.
    pub categories: Vec<CategoryRule>,
    pub anchors: AnchorMap,
}

impl SyncConfig {
    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.categories.clone())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            config_version: CONFIG_VERSION.to_string(),
            manifest: "project.pbxproj".to_string(),
            known_files: vec![
                "App/MovingMountainsDriverApp.swift".to_string(),
                "App/AppDelegate.swift".to_string(),
                "App/SceneDelegate.swift".to_string(),
            ],
            discovery: DiscoveryOptions::default(),
            file_type: DEFAULT_FILE_TYPE.to_string(),
            categories: Classifier::default().rules().to_vec(),
            anchors: AnchorMap::default(),
        }
    }
}
