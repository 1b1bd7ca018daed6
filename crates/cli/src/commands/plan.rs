use anyhow::{Context, Result};
use pbxsync_core::services::sync::ManifestSync;

use crate::commands::load_project;

/// List the files a sync would add, without touching the manifest.
pub fn plan_command(
    root: &str,
    config_path: Option<&str>,
    manifest: Option<&str>,
    json: bool,
) -> Result<()> {
    let (layout, config) = load_project(root, config_path, manifest)?;
    let sync = ManifestSync::new(&layout, &config);
    let manifest_text = sync.read_manifest()?;
    let plan = sync.plan(&manifest_text).context("Failed to plan sync")?;

    if json {
        let serialized =
            serde_json::to_string_pretty(&plan).context("Failed to serialize plan to JSON")?;
        println!("{}", serialized);
        return Ok(());
    }

    println!("Pending files ({}):", plan.entries.len());
    if plan.entries.is_empty() {
        println!("  (none)");
    }
    for entry in &plan.entries {
        println!("  - {} [{}] id={} build={}", entry.path, entry.category, entry.id, entry.build_id);
    }
    if !plan.already_declared.is_empty() {
        println!("Already declared ({}):", plan.already_declared.len());
        for path in &plan.already_declared {
            println!("  - {}", path);
        }
    }

    Ok(())
}
