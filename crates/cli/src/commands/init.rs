use anyhow::{anyhow, Result};
use pbxsync_core::project::{write_sync_config, ProjectLayout, SyncConfig};

use crate::canonicalize_or_current;

/// Write the default sync config under `root`.
pub fn init_command(root: &str, manifest: Option<String>, force: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = ProjectLayout::new(&root_path);

    if layout.config_path.exists() && !force {
        return Err(anyhow!(
            "Config already exists at {} (use --force to overwrite)",
            layout.config_path.display()
        ));
    }

    let mut config = SyncConfig::default();
    if let Some(manifest) = manifest {
        config.manifest = manifest;
    }
    write_sync_config(&layout, &config)?;

    println!("Initialized pbxsync config:");
    println!("  Root: {}", layout.root.display());
    println!("  Config: {}", layout.config_path.display());
    println!("  Manifest: {}", layout.resolve(&config.manifest).display());

    Ok(())
}
