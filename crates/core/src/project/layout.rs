use std::path::{Path, PathBuf};

/// Directory under the project root holding pbxsync metadata.
pub const META_DIR_NAME: &str = ".pbxsync";

/// Logical layout of a project on disk.
///
/// This is derived from a chosen root path. It does *not* perform any IO itself.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    /// Root directory of the project (where discovery starts).
    pub root: PathBuf,
    /// Directory for internal metadata (.pbxsync).
    pub meta_dir: PathBuf,
    /// Path to the default config file (JSON).
    pub config_path: PathBuf,
}

impl ProjectLayout {
    /// Compute the default layout for a project rooted at `root`.
    ///
    /// This does *not* touch the filesystem.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let meta_dir = root.join(META_DIR_NAME);
        let config_path = meta_dir.join("config.json");
        Self { root, meta_dir, config_path }
    }

    /// Resolve a config-relative path (absolute paths pass through).
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}
