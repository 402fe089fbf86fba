//! Normalized path handling for tree-relative paths

use std::path::{Path, PathBuf};

/// Directory key used for files that sit directly at a tree root.
pub const ROOT_DIR: &str = ".";

/// A path normalized to use forward slashes internally.
///
/// Relative paths inside the corepkgs and nixpkgs trees are compared and
/// rewritten as strings, so they are kept in one canonical spelling:
/// forward slashes, no trailing slash. Conversion to a platform-native
/// path only happens at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes and drops trailing slashes.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let normalized = path_str.replace('\\', "/");
        let trimmed = normalized.trim_end_matches('/');
        let inner = if trimmed.is_empty() && normalized.starts_with('/') {
            "/".to_string()
        } else {
            trimmed.to_string()
        };
        Self { inner }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        let segment_normalized = segment_normalized.trim_matches('/');
        if segment_normalized.is_empty() {
            return self.clone();
        }
        let joined = if self.inner.is_empty() {
            segment_normalized.to_string()
        } else if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment_normalized)
        } else {
            format!("{}/{}", self.inner, segment_normalized)
        };
        Self { inner: joined }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        match self.inner.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            Some(0) if self.inner.len() > 1 => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Directory that owns this path, or [`ROOT_DIR`] for top-level entries.
    pub fn directory(&self) -> String {
        self.parent()
            .map(|p| p.inner)
            .unwrap_or_else(|| ROOT_DIR.to_string())
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        self.inner.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Whether this path equals `prefix` or is nested below it.
    ///
    /// Matching is segment-aware: `pkgs/rust` is under `pkgs`, `pkgs-many` is not.
    pub fn is_under(&self, prefix: &str) -> bool {
        self.strip_dir_prefix(prefix).is_some()
    }

    /// Remainder of this path below `prefix`.
    ///
    /// Returns `Some("")` when the path equals the prefix and `None` when it
    /// is not nested under it.
    pub fn strip_dir_prefix(&self, prefix: &str) -> Option<&str> {
        let prefix = prefix.trim_end_matches('/');
        if self.inner == prefix {
            return Some("");
        }
        self.inner
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('/'))
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
