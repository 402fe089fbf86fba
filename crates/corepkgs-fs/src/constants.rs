//! Well-known names found in package trees.

use std::path::Path;

/// Path components that mark content outside the package sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeMarker {
    /// The `.git` directory (version-control internals)
    GitDir,
    /// The `result` symlink left behind by `nix-build`
    BuildResult,
}

impl TreeMarker {
    /// Get the string representation of the marker.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GitDir => ".git",
            Self::BuildResult => "result",
        }
    }

    /// Whether a single path component carries this marker.
    ///
    /// Build results also come with output suffixes (`result-dev`, `result-man`).
    pub fn matches(&self, component: &str) -> bool {
        match self {
            Self::GitDir => component == self.as_str(),
            Self::BuildResult => {
                component == self.as_str()
                    || component
                        .strip_prefix(self.as_str())
                        .is_some_and(|rest| rest.starts_with('-'))
            }
        }
    }

    /// Whether any component of `path` is a version-control or build-output marker.
    pub fn is_excluded(path: &Path) -> bool {
        path.components().any(|c| {
            let component = c.as_os_str().to_string_lossy();
            Self::GitDir.matches(&component) || Self::BuildResult.matches(&component)
        })
    }
}

impl AsRef<Path> for TreeMarker {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl std::fmt::Display for TreeMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
