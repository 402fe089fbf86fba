//! Command implementations for corepkgs-cli

pub mod import;
pub mod init_config;
pub mod sanitize;
pub mod sync;

use std::path::{Path, PathBuf};

use crate::error::{CliError, Result};

pub use import::run_import;
pub use init_config::run_init_config;
pub use sanitize::run_sanitize;
pub use sync::run_sync;

/// Canonical path of an existing checkout.
fn resolve_root(path: &Path, what: &str) -> Result<PathBuf> {
    if !path.is_dir() {
        return Err(CliError::user(format!(
            "{what} directory not found at {}",
            path.display()
        )));
    }
    Ok(dunce::canonicalize(path)?)
}

/// The nixpkgs checkout: explicit, or `nixpkgs` next to the corepkgs root.
fn resolve_nixpkgs(explicit: Option<&Path>, corepkgs: &Path) -> Result<PathBuf> {
    let candidate = match explicit {
        Some(path) => path.to_path_buf(),
        None => corepkgs
            .parent()
            .map(|parent| parent.join("nixpkgs"))
            .unwrap_or_else(|| PathBuf::from("nixpkgs")),
    };
    resolve_root(&candidate, "nixpkgs")
}
