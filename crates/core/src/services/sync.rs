//! One synchronization run: discover, filter, classify, render, patch, write.
//!
//! The manifest is read once at the start and written once at the end. All
//! mutation happens on an in-memory buffer, and the write goes through a temp
//! file in the manifest's directory followed by a rename, so a failed run never
//! leaves a partially written manifest behind.

use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use crate::classify::Classifier;
use crate::discover::FileDiscoverer;
use crate::format::{EntryFormatter, FragmentSet};
use crate::model::{Entry, SourcePath};
use crate::patch::{ManifestPatcher, PatchError, PatchReport};
use crate::project::{ProjectLayout, SyncConfig};

/// Error type for sync runs.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Failed to read manifest at {path}: {source}")]
    ReadManifest { path: PathBuf, source: io::Error },

    #[error("Failed to write manifest at {path}: {source}")]
    WriteManifest { path: PathBuf, source: io::Error },

    #[error("Failed to discover source files: {0}")]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Patch(#[from] PatchError),
}

/// Convenience result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Options for a single run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Compute and patch in memory but leave the manifest file untouched.
    pub dry_run: bool,
}

/// Files a run would add, with their rendered fragments.
#[derive(Debug, Clone, Serialize)]
pub struct SyncPlan {
    pub discovered: usize,
    /// New entries in discovery order.
    pub entries: Vec<Entry>,
    /// Discovered files skipped because the manifest already declares them.
    pub already_declared: Vec<SourcePath>,
    #[serde(skip)]
    pub fragments: FragmentSet,
}

/// What a run did.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub manifest: PathBuf,
    pub added: Vec<Entry>,
    pub already_declared: Vec<SourcePath>,
    pub patch: PatchReport,
    pub written: bool,
    pub dry_run: bool,
}

impl SyncReport {
    pub fn added_count(&self) -> usize {
        self.added.len()
    }
}

/// Select the entries to add out of `discovered`, keeping discovery order.
///
/// A file is skipped when it is listed in `known` or when its declaration
/// identifier already occurs in `manifest`, which makes reruns insert nothing.
pub fn select_new_entries(
    discovered: &[SourcePath],
    known: &HashSet<SourcePath>,
    manifest: &str,
    classifier: &Classifier,
) -> (Vec<Entry>, Vec<SourcePath>) {
    let mut entries = Vec::new();
    let mut already_declared = Vec::new();
    let mut seen = HashSet::new();

    for path in discovered {
        if known.contains(path) || !seen.insert(path.clone()) {
            continue;
        }
        let entry = Entry::new(path.clone(), classifier.classify(path));
        if manifest.contains(entry.id.as_str()) {
            debug!(path = %path, id = %entry.id, "already declared, skipping");
            already_declared.push(path.clone());
            continue;
        }
        entries.push(entry);
    }
    (entries, already_declared)
}

/// Runs the sync pipeline for one project.
#[derive(Debug)]
pub struct ManifestSync<'a> {
    layout: &'a ProjectLayout,
    config: &'a SyncConfig,
}

impl<'a> ManifestSync<'a> {
    pub fn new(layout: &'a ProjectLayout, config: &'a SyncConfig) -> Self {
        Self { layout, config }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.layout.resolve(&self.config.manifest)
    }

    pub fn read_manifest(&self) -> SyncResult<String> {
        let path = self.manifest_path();
        fs::read_to_string(&path).map_err(|source| SyncError::ReadManifest { path, source })
    }

    /// Discover files and work out which ones the manifest is missing.
    pub fn plan(&self, manifest: &str) -> SyncResult<SyncPlan> {
        let discovered = FileDiscoverer::new(&self.config.discovery).discover(&self.layout.root)?;
        let known: HashSet<SourcePath> =
            self.config.known_files.iter().map(|f| SourcePath::new(f.as_str())).collect();

        let (entries, already_declared) =
            select_new_entries(&discovered, &known, manifest, &self.config.classifier());
        let fragments = EntryFormatter::new(&self.config.file_type).render(&entries);

        info!(
            discovered = discovered.len(),
            new = entries.len(),
            already_declared = already_declared.len(),
            "planned sync"
        );
        Ok(SyncPlan { discovered: discovered.len(), entries, already_declared, fragments })
    }

    /// Full run: read, plan, patch, and write back unless `dry_run`.
    pub fn run(&self, options: SyncOptions) -> SyncResult<SyncReport> {
        let manifest_path = self.manifest_path();
        let manifest = self.read_manifest()?;
        let plan = self.plan(&manifest)?;

        let outcome = ManifestPatcher::new(&self.config.anchors).patch(&manifest, &plan.fragments)?;

        let written = if options.dry_run || plan.entries.is_empty() {
            false
        } else {
            write_atomically(&manifest_path, &outcome.text)
                .map_err(|source| SyncError::WriteManifest { path: manifest_path.clone(), source })?;
            info!(path = %manifest_path.display(), "wrote manifest");
            true
        };

        Ok(SyncReport {
            manifest: manifest_path,
            added: plan.entries,
            already_declared: plan.already_declared,
            patch: outcome.report,
            written,
            dry_run: options.dry_run,
        })
    }
}

/// Replace `path` with `contents` via a sibling temp file and a rename.
fn write_atomically(path: &Path, contents: &str) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
