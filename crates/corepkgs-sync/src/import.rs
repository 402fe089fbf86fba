//! Copying packages from nixpkgs into corepkgs
//!
//! A by-name package `foo` lives at `pkgs/by-name/fo/foo` upstream and is
//! imported to `pkgs/foo`; a Python package is taken from
//! `pkgs/development/python-modules/<name>` and placed in
//! `python/pkgs/<name>`. Upstream `package.nix` files become `default.nix`.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{Error, Result};

const BY_NAME_BUCKET: &str = "pkgs/by-name";
const PYTHON_MODULES_DIR: &str = "pkgs/development/python-modules";
const LOCAL_PKGS_DIR: &str = "pkgs";
const LOCAL_PYTHON_DIR: &str = "python/pkgs";

/// Where a package lives upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportKind {
    #[default]
    ByName,
    Python,
}

/// What an import did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub name: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    /// `package.nix` was renamed to `default.nix`.
    pub renamed: bool,
}

/// Imports package directories from a nixpkgs checkout.
#[derive(Debug, Clone)]
pub struct PackageImporter {
    nixpkgs_root: PathBuf,
    corepkgs_root: PathBuf,
    force: bool,
}

impl PackageImporter {
    pub fn new(nixpkgs_root: impl Into<PathBuf>, corepkgs_root: impl Into<PathBuf>) -> Self {
        Self {
            nixpkgs_root: nixpkgs_root.into(),
            corepkgs_root: corepkgs_root.into(),
            force: false,
        }
    }

    /// Replace existing destinations instead of failing.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Upstream directory for a package.
    pub fn source_dir(&self, name: &str, kind: ImportKind) -> PathBuf {
        match kind {
            ImportKind::ByName => {
                // Shards keep the name's case, unlike the mapper's lookups.
                let shard: String = name.chars().take(2).collect();
                self.nixpkgs_root.join(BY_NAME_BUCKET).join(shard).join(name)
            }
            ImportKind::Python => self.nixpkgs_root.join(PYTHON_MODULES_DIR).join(name),
        }
    }

    /// Local directory a package is imported to.
    pub fn destination_dir(&self, name: &str, kind: ImportKind) -> PathBuf {
        let base = match kind {
            ImportKind::ByName => LOCAL_PKGS_DIR,
            ImportKind::Python => LOCAL_PYTHON_DIR,
        };
        self.corepkgs_root.join(base).join(name)
    }

    /// Import one package.
    ///
    /// # Errors
    ///
    /// Fails on a name that is not a single path segment, a missing or
    /// non-directory source, and an existing destination without `force`.
    pub fn import(&self, name: &str, kind: ImportKind) -> Result<ImportOutcome> {
        validate_name(name)?;

        let source = self.source_dir(name, kind);
        if !source.exists() {
            return Err(Error::ImportSourceMissing { path: source });
        }
        if !source.is_dir() {
            return Err(Error::ImportSourceNotDirectory { path: source });
        }

        let destination = self.destination_dir(name, kind);
        if destination.exists() || destination.is_symlink() {
            if !self.force {
                return Err(Error::ImportDestinationExists { path: destination });
            }
            tracing::info!(path = %destination.display(), "Replacing existing package");
            remove_path(&destination)?;
        }

        copy_tree(&source, &destination)?;
        let renamed = rename_package_file(&destination)?;

        tracing::info!(
            package = name,
            source = %source.display(),
            destination = %destination.display(),
            "Imported package"
        );

        Ok(ImportOutcome {
            name: name.to_string(),
            source,
            destination,
            renamed,
        })
    }
}

fn validate_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\');
    if invalid {
        return Err(Error::InvalidPackageName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn remove_path(path: &Path) -> Result<()> {
    let result = if path.is_dir() && !path.is_symlink() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| Error::io(path, e))
}

/// Copy `source` to `destination`, recreating symlinks instead of following
/// them.
fn copy_tree(source: &Path, destination: &Path) -> Result<()> {
    for entry in WalkDir::new(source).follow_links(false) {
        let entry = entry.map_err(|e| Error::Walk {
            root: source.to_path_buf(),
            source: e,
        })?;
        let rel = entry
            .path()
            .strip_prefix(source)
            .unwrap_or_else(|_| Path::new(""));
        let target = destination.join(rel);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
        } else if file_type.is_symlink() {
            let link = fs::read_link(entry.path()).map_err(|e| Error::io(entry.path(), e))?;
            create_symlink(&link, &target)?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| Error::io(&target, e))?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn create_symlink(link: &Path, target: &Path) -> Result<()> {
    std::os::unix::fs::symlink(link, target).map_err(|e| Error::io(target, e))
}

#[cfg(not(unix))]
fn create_symlink(link: &Path, target: &Path) -> Result<()> {
    let resolved = target.parent().map(|p| p.join(link)).unwrap_or_else(|| link.to_path_buf());
    fs::copy(&resolved, target)
        .map(|_| ())
        .map_err(|e| Error::io(target, e))
}

fn rename_package_file(destination: &Path) -> Result<bool> {
    let package = destination.join("package.nix");
    if !package.exists() {
        return Ok(false);
    }

    let default = destination.join("default.nix");
    if default.exists() {
        tracing::warn!(
            path = %destination.display(),
            "Both package.nix and default.nix present; leaving package.nix"
        );
        return Ok(false);
    }

    fs::rename(&package, &default).map_err(|e| Error::io(&package, e))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use corepkgs_test_utils::TreeFixture;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn importer(fixture: &TreeFixture) -> PackageImporter {
        PackageImporter::new(fixture.upstream(), fixture.local())
    }

    #[test]
    fn test_by_name_import_renames_package_file() {
        let fixture = TreeFixture::new()
            .with_upstream("pkgs/by-name/he/hello/package.nix", "{ }\n")
            .with_upstream("pkgs/by-name/he/hello/test.sh", "echo\n");

        let outcome = importer(&fixture).import("hello", ImportKind::ByName).unwrap();

        assert!(outcome.renamed);
        assert_eq!(outcome.destination, fixture.local().join("pkgs/hello"));
        assert_eq!(fixture.read_local("pkgs/hello/default.nix"), "{ }\n");
        fixture.assert_local_exists("pkgs/hello/test.sh");
        fixture.assert_local_not_exists("pkgs/hello/package.nix");
    }

    #[test]
    fn test_shard_keeps_case() {
        let fixture = TreeFixture::new();
        let source = importer(&fixture).source_dir("SDL2", ImportKind::ByName);
        assert_eq!(source, fixture.upstream().join("pkgs/by-name/SD/SDL2"));
    }

    #[test]
    fn test_python_import() {
        let fixture = TreeFixture::new()
            .with_upstream("pkgs/development/python-modules/requests/default.nix", "{ }\n");

        let outcome = importer(&fixture).import("requests", ImportKind::Python).unwrap();

        assert!(!outcome.renamed);
        fixture.assert_local_exists("python/pkgs/requests/default.nix");
    }

    #[test]
    fn test_existing_default_is_kept() {
        let fixture = TreeFixture::new()
            .with_upstream("pkgs/by-name/fo/foo/package.nix", "package\n")
            .with_upstream("pkgs/by-name/fo/foo/default.nix", "default\n");

        let outcome = importer(&fixture).import("foo", ImportKind::ByName).unwrap();

        assert!(!outcome.renamed);
        assert_eq!(fixture.read_local("pkgs/foo/default.nix"), "default\n");
        fixture.assert_local_exists("pkgs/foo/package.nix");
    }

    #[test]
    fn test_missing_source() {
        let fixture = TreeFixture::new();
        let err = importer(&fixture).import("absent", ImportKind::ByName).unwrap_err();
        assert!(matches!(err, Error::ImportSourceMissing { .. }));
    }

    #[test]
    fn test_source_not_directory() {
        let fixture = TreeFixture::new().with_upstream("pkgs/by-name/fo/foo", "file");
        let err = importer(&fixture).import("foo", ImportKind::ByName).unwrap_err();
        assert!(matches!(err, Error::ImportSourceNotDirectory { .. }));
    }

    #[test]
    fn test_existing_destination_requires_force() {
        let fixture = TreeFixture::new()
            .with_upstream("pkgs/by-name/fo/foo/package.nix", "new\n")
            .with_local("pkgs/foo/default.nix", "old\n")
            .with_local("pkgs/foo/stale.nix", "stale\n");

        let err = importer(&fixture).import("foo", ImportKind::ByName).unwrap_err();
        assert!(matches!(err, Error::ImportDestinationExists { .. }));
        assert_eq!(fixture.read_local("pkgs/foo/default.nix"), "old\n");

        importer(&fixture)
            .force(true)
            .import("foo", ImportKind::ByName)
            .unwrap();
        assert_eq!(fixture.read_local("pkgs/foo/default.nix"), "new\n");
        fixture.assert_local_not_exists("pkgs/foo/stale.nix");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_preserved() {
        let fixture = TreeFixture::new().with_upstream("pkgs/by-name/li/link/package.nix", "{ }\n");
        let source = fixture.upstream().join("pkgs/by-name/li/link");
        std::os::unix::fs::symlink("package.nix", source.join("alias.nix")).unwrap();

        importer(&fixture).import("link", ImportKind::ByName).unwrap();

        let alias = fixture.local().join("pkgs/link/alias.nix");
        assert!(alias.is_symlink());
        assert_eq!(fs::read_link(alias).unwrap(), PathBuf::from("package.nix"));
    }

    #[rstest]
    #[case::empty("")]
    #[case::dot(".")]
    #[case::dotdot("..")]
    #[case::nested("a/b")]
    fn test_invalid_names(#[case] name: &str) {
        let fixture = TreeFixture::new();
        let err = importer(&fixture).import(name, ImportKind::ByName).unwrap_err();
        assert!(matches!(err, Error::InvalidPackageName { .. }));
    }
}
