//! Comparison of the local tree against upstream
//!
//! - **walker**: classify every local file as identical, different or not found
//! - **discovery**: find upstream-only files below the monitored roots
//! - **stats**: counters and per-directory findings shared by both passes

mod discovery;
mod stats;
mod walker;

pub use discovery::{DirListing, FsListing, NewFileDiscovery, TreeListing};
pub use stats::{DiffEntry, DiffStats, directory_of, is_root_dir};
pub use walker::TreeWalker;
