//! Deterministic identifiers for generated manifest entries.
//!
//! Identifiers have the native 24-character width of the manifest format. Each
//! is two segments, each segment the `1B` marker followed by ten uppercase hex
//! digits taken from disjoint slices of the SHA-256 digest of the seed. The
//! marker sets generated identifiers apart from hand-authored ones.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::model::SourcePath;

/// Marker prefixed to both identifier segments.
pub const ID_MARKER: &str = "1B";

/// Role tag mixed into the seed of build-association identifiers.
pub const BUILD_ROLE: &str = "build";

/// Hex digits taken from the digest for each segment.
const SEGMENT_HEX_LEN: usize = 10;

/// A generated manifest identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Derive an identifier from an arbitrary seed. Any string is accepted.
    pub fn for_seed(seed: &str) -> Self {
        let digest = Sha256::digest(seed.as_bytes());
        let hex = format!("{:X}", digest);
        let (first, rest) = hex.split_at(SEGMENT_HEX_LEN);
        let second = &rest[..SEGMENT_HEX_LEN];
        Self(format!("{ID_MARKER}{first}{ID_MARKER}{second}"))
    }

    /// Identifier of a file's declaration, seeded by its path.
    pub fn for_path(path: &SourcePath) -> Self {
        Self::for_seed(path.as_str())
    }

    /// Identifier seeded by `"{role}-{path}"`.
    pub fn for_role(role: &str, path: &SourcePath) -> Self {
        Self::for_seed(&format!("{role}-{}", path.as_str()))
    }

    /// Identifier of a file's build association.
    pub fn for_build(path: &SourcePath) -> Self {
        Self::for_role(BUILD_ROLE, path)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
