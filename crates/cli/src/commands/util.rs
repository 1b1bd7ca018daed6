use std::path::Path;

use anyhow::Result;
use pbxsync_core::project::{resolve_sync_config, ProjectLayout, SyncConfig};

use crate::canonicalize_or_current;

/// Resolve the project root and load its sync config, applying a manifest
/// override from the command line.
pub fn load_project(
    root: &str,
    config_path: Option<&str>,
    manifest: Option<&str>,
) -> Result<(ProjectLayout, SyncConfig)> {
    let root_path = canonicalize_or_current(root)?;
    let layout = ProjectLayout::new(&root_path);
    let mut config = resolve_sync_config(&layout, config_path.map(Path::new))?;
    if let Some(manifest) = manifest {
        config.manifest = manifest.to_string();
    }
    tracing::debug!(root = %layout.root.display(), manifest = %config.manifest, "loaded project");
    Ok((layout, config))
}
