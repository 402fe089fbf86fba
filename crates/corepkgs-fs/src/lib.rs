//! Filesystem primitives for the corepkgs maintenance tools
//!
//! Provides slash-normalized relative paths, atomic writes, byte-level file
//! comparison and format-agnostic configuration loading.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::TreeMarker;
pub use error::{Error, Result};
pub use path::{NormalizedPath, ROOT_DIR};
