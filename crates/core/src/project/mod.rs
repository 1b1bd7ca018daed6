//! Project layout and sync configuration.
//!
//! `ProjectLayout` computes where things live under a root; `SyncConfig`
//! describes how a sync run behaves. Both are pure data. The helpers in
//! `util` do the file IO.

pub mod config;
pub mod layout;
pub mod util;

pub use config::*;
pub use layout::*;
pub use util::*;
