use anyhow::{Context, Result};
use pbxsync_core::services::sync::{ManifestSync, SyncOptions, SyncReport};

use crate::commands::load_project;

/// Register new source files in the manifest.
pub fn sync_command(
    root: &str,
    config_path: Option<&str>,
    manifest: Option<&str>,
    dry_run: bool,
    json: bool,
) -> Result<()> {
    let (layout, config) = load_project(root, config_path, manifest)?;
    let report = ManifestSync::new(&layout, &config)
        .run(SyncOptions { dry_run })
        .context("Failed to sync manifest")?;

    if json {
        let serialized =
            serde_json::to_string_pretty(&report).context("Failed to serialize report to JSON")?;
        println!("{}", serialized);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &SyncReport) {
    if report.dry_run {
        println!(
            "Dry run: would update {} with {} new files",
            report.manifest.display(),
            report.added_count()
        );
        for entry in &report.added {
            println!("  - {} [{}]", entry.path, entry.category);
        }
    } else {
        println!("Successfully updated project file with {} new files", report.added_count());
    }
    for (section, reason) in report.patch.skipped() {
        println!("  Skipped {section}: {reason}");
    }
}
