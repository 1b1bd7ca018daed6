//! Higher-level operations composed from the core modules.

pub mod sync;
