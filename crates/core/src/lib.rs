//! pbxsync-core
//!
//! Core library for keeping an Xcode `project.pbxproj` manifest in sync with the
//! source files present on disk.
//!
//! The pipeline is: discover files, drop the ones the manifest already knows,
//! classify and identify the rest, render their manifest fragments, and splice
//! those fragments into the raw manifest text. The manifest is never parsed into
//! an object model; every insertion is a positional text edit.
//!
//! All substantive logic lives here so it is fully testable and reusable from
//! frontends other than the `pbxsync` CLI.

pub mod model;
pub mod ident;
pub mod classify;
pub mod format;
pub mod patch;
pub mod discover;
pub mod project;
pub mod services;

/// Returns the library version as encoded at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
