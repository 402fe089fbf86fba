//! [`TreeFixture`]: a corepkgs checkout next to a nixpkgs checkout.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Two sibling trees, `corepkgs/` and `nixpkgs/`, inside one temporary
/// directory.
///
/// # Example
///
/// ```rust
/// use corepkgs_test_utils::TreeFixture;
///
/// let fixture = TreeFixture::new()
///     .with_local("build-support/bintools-wrapper/default.nix", "existing")
///     .with_upstream("pkgs/build-support/bintools-wrapper/new-file.nix", "new");
/// fixture.assert_local_exists("build-support/bintools-wrapper/default.nix");
/// assert!(fixture.upstream().join("pkgs/build-support").is_dir());
/// ```
pub struct TreeFixture {
    temp_dir: TempDir,
}

impl Default for TreeFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeFixture {
    /// Create both (empty) trees.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("corepkgs")).unwrap();
        fs::create_dir_all(temp_dir.path().join("nixpkgs")).unwrap();
        Self { temp_dir }
    }

    /// Build both trees from `(path, content)` lists.
    ///
    /// A `None` content creates a directory instead of a file.
    pub fn from_structure(
        local: &[(&str, Option<&str>)],
        upstream: &[(&str, Option<&str>)],
    ) -> Self {
        let fixture = Self::new();
        create_structure(&fixture.local(), local);
        create_structure(&fixture.upstream(), upstream);
        fixture
    }

    /// Directory holding both trees.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Root of the corepkgs tree.
    pub fn local(&self) -> PathBuf {
        self.root().join("corepkgs")
    }

    /// Root of the nixpkgs tree.
    pub fn upstream(&self) -> PathBuf {
        self.root().join("nixpkgs")
    }

    /// Add a file to the corepkgs tree.
    pub fn with_local(self, path: &str, content: &str) -> Self {
        write_file(&self.local(), path, content);
        self
    }

    /// Add a file to the nixpkgs tree.
    pub fn with_upstream(self, path: &str, content: &str) -> Self {
        write_file(&self.upstream(), path, content);
        self
    }

    /// Add an empty directory to the corepkgs tree.
    pub fn with_local_dir(self, path: &str) -> Self {
        fs::create_dir_all(self.local().join(path)).unwrap();
        self
    }

    /// Add an empty directory to the nixpkgs tree.
    pub fn with_upstream_dir(self, path: &str) -> Self {
        fs::create_dir_all(self.upstream().join(path)).unwrap();
        self
    }

    /// Read a file of the corepkgs tree.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read_local(&self, path: &str) -> String {
        let full_path = self.local().join(path);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    /// Assert that `path` (relative to the corepkgs root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_local_exists(&self, path: &str) {
        let full_path = self.local().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the corepkgs root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_local_not_exists(&self, path: &str) {
        let full_path = self.local().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }
}

fn write_file(root: &Path, path: &str, content: &str) {
    let full_path = root.join(path);
    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(full_path, content).unwrap();
}

fn create_structure(root: &Path, structure: &[(&str, Option<&str>)]) {
    for (path, content) in structure {
        match content {
            Some(content) => write_file(root, path, content),
            None => fs::create_dir_all(root.join(path)).unwrap(),
        }
    }
}
