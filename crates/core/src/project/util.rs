use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::project::{ProjectLayout, SyncConfig};

/// Load a sync config from an explicit file, choosing the format by extension
/// (`.json`, `.yaml`, `.yml`).
pub fn load_sync_config(path: &Path) -> Result<SyncConfig> {
    let body = fs::read_to_string(path)
        .with_context(|| format!("Failed to read sync config at {}", path.display()))?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let config = match ext {
        "json" => serde_json::from_str(&body).context("Failed to parse sync config JSON")?,
        "yaml" | "yml" => serde_yaml::from_str(&body).context("Failed to parse sync config YAML")?,
        other => return Err(anyhow!("Unsupported config format `{other}`: {}", path.display())),
    };
    Ok(config)
}

/// Load the project's config, falling back to defaults when none exists.
///
/// An explicit `override_path` must exist.
pub fn resolve_sync_config(layout: &ProjectLayout, override_path: Option<&Path>) -> Result<SyncConfig> {
    match override_path {
        Some(path) => load_sync_config(&layout.resolve(path)),
        None if layout.config_path.exists() => load_sync_config(&layout.config_path),
        None => Ok(SyncConfig::default()),
    }
}

/// Write `config` as pretty JSON to the layout's config path.
pub fn write_sync_config(layout: &ProjectLayout, config: &SyncConfig) -> Result<()> {
    fs::create_dir_all(&layout.meta_dir)
        .with_context(|| format!("Failed to create meta dir: {}", layout.meta_dir.display()))?;
    let json = serde_json::to_string_pretty(config).context("Failed to serialize sync config")?;
    fs::write(&layout.config_path, json).with_context(|| {
        format!("Failed to write sync config: {}", layout.config_path.display())
    })?;
    Ok(())
}
