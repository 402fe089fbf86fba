//! Error types for corepkgs-sync

use std::path::PathBuf;

/// Result type for corepkgs-sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in corepkgs-sync operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A tree root given to the engine is not a directory
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// The diff executable could not be started
    #[error("Failed to run {program}: {source}")]
    DiffSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed
    #[error("Failed to walk {root}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Package to import does not exist upstream
    #[error("Source not found: {path}")]
    ImportSourceMissing { path: PathBuf },

    /// Package to import exists upstream but is not a directory
    #[error("Source is not a directory: {path}")]
    ImportSourceNotDirectory { path: PathBuf },

    /// Import destination is already present
    #[error("Destination already exists: {path} (use --force to overwrite)")]
    ImportDestinationExists { path: PathBuf },

    /// Package name that cannot be used as a path segment
    #[error("Invalid package name: {name:?}")]
    InvalidPackageName { name: String },

    /// Filesystem error with path context
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from corepkgs-fs
    #[error(transparent)]
    Fs(#[from] corepkgs_fs::Error),

    /// Diff error from corepkgs-patch
    #[error(transparent)]
    Patch(#[from] corepkgs_patch::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
