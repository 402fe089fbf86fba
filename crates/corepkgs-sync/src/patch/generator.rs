//! Per-directory patch generation
//!
//! For every directory with findings, the local directory is diffed against
//! its upstream counterpart, headers are relabelled for `patch -p1`,
//! maintainer-only hunks are dropped and whatever remains is written to
//! `<patches>/<dir with / replaced by _>.patch`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use corepkgs_fs::{NormalizedPath, io};
use corepkgs_patch::{HeaderLabels, MetadataFilter, relabel_headers};
use serde::Serialize;

use crate::Result;
use crate::config::SyncConfig;
use crate::mapper::PathMapper;
use crate::patch::runner::DiffRunner;
use crate::scan::{DiffEntry, is_root_dir};

/// A patch file written for one directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedPatch {
    /// Directory relative to the corepkgs root.
    pub dir: String,
    pub path: PathBuf,
    /// Findings recorded for the directory.
    pub file_count: usize,
    /// Hunks removed by the metadata filter.
    pub dropped_hunks: usize,
}

/// Patch file name for a directory key.
pub fn patch_file_name(dir: &str) -> String {
    if is_root_dir(dir) {
        "root.patch".to_string()
    } else {
        format!("{}.patch", dir.replace('/', "_"))
    }
}

/// Writes one patch per directory with findings.
pub struct PatchGenerator<'a> {
    config: &'a SyncConfig,
    mapper: &'a PathMapper<'a>,
    runner: &'a dyn DiffRunner,
    filter: MetadataFilter,
    patches_dir: PathBuf,
    generated_at: String,
}

impl<'a> PatchGenerator<'a> {
    pub fn new(
        config: &'a SyncConfig,
        mapper: &'a PathMapper<'a>,
        runner: &'a dyn DiffRunner,
        generated_at: impl Into<String>,
    ) -> Self {
        Self {
            config,
            mapper,
            runner,
            filter: MetadataFilter::maintainers(),
            patches_dir: mapper.local_root().join(&config.patches_dir),
            generated_at: generated_at.into(),
        }
    }

    pub fn patches_dir(&self) -> &Path {
        &self.patches_dir
    }

    /// Generate patches for all directories in key order.
    pub fn generate_all(
        &self,
        directories: &BTreeMap<String, Vec<DiffEntry>>,
    ) -> Result<Vec<GeneratedPatch>> {
        tracing::info!(directories = directories.len(), "Generating directory patches");

        let mut generated = Vec::new();
        for (dir, entries) in directories {
            if let Some(patch) = self.generate(dir, entries)? {
                tracing::info!(
                    patch = %patch.path.display(),
                    files = patch.file_count,
                    "Generated patch"
                );
                generated.push(patch);
            }
        }
        Ok(generated)
    }

    /// Generate the patch for one directory.
    ///
    /// Returns `None` for the root directory, when either side is not a
    /// directory, when the trees are identical, and when only
    /// maintainer-metadata hunks differ.
    pub fn generate(&self, dir: &str, entries: &[DiffEntry]) -> Result<Option<GeneratedPatch>> {
        if is_root_dir(dir) {
            return Ok(None);
        }

        let Some(upstream_dir) = self.resolve_upstream_dir(dir, entries) else {
            tracing::debug!(dir, "No upstream directory");
            return Ok(None);
        };
        let local_dir = self.mapper.local_root().join(dir);
        if !local_dir.is_dir() || !upstream_dir.is_dir() {
            tracing::debug!(dir, upstream = %upstream_dir.display(), "Not a directory pair; skipped");
            return Ok(None);
        }

        let output = self.runner.diff(&local_dir, &upstream_dir)?;
        if output.is_identical() {
            return Ok(None);
        }
        if output.status > 1 {
            tracing::warn!(dir, status = output.status, stderr = %output.stderr.trim_end(), "diff reported trouble");
        }

        let labels = HeaderLabels::new(
            dir,
            &local_dir.display().to_string(),
            &upstream_dir.display().to_string(),
        );
        let relabelled = relabel_headers(&output.stdout, &labels);
        let filtered = self.filter.apply(&relabelled);
        if !filtered.has_changes {
            tracing::debug!(dir, dropped = filtered.dropped_hunks, "Only metadata changes");
            return Ok(None);
        }

        let name = patch_file_name(dir);
        let source = upstream_dir
            .strip_prefix(self.mapper.upstream_root())
            .map(|p| NormalizedPath::new(p).to_string())
            .unwrap_or_else(|_| upstream_dir.display().to_string());

        let mut content = format!(
            "# Patch for directory: {dir}\n\
             # Source directory in nixpkgs: {source}\n\
             # Generated: {}\n\
             # Files in directory: {}\n\
             #\n\
             # To apply from corepkgs root:\n\
             #   patch -p1 < {}/{name}\n\
             #\n",
            self.generated_at,
            entries.len(),
            self.config.patches_dir,
        );
        content.push_str(&filtered.content);
        if !content.ends_with('\n') {
            content.push('\n');
        }
        if !output.stderr.is_empty() {
            content.push_str(&output.stderr);
            if !output.stderr.ends_with('\n') {
                content.push('\n');
            }
        }

        let path = self.patches_dir.join(&name);
        io::write_text(&NormalizedPath::new(&path), &content)?;

        Ok(Some(GeneratedPatch {
            dir: dir.to_string(),
            path,
            file_count: entries.len(),
            dropped_hunks: filtered.dropped_hunks,
        }))
    }

    /// Upstream directory compared with the local directory `dir`.
    ///
    /// The mapping table is tried first, then the identical path, then the
    /// parent of the first recorded upstream file.
    pub fn resolve_upstream_dir(&self, dir: &str, entries: &[DiffEntry]) -> Option<PathBuf> {
        let from_entries = || {
            entries
                .first()
                .and_then(|e| e.upstream.as_deref())
                .and_then(Path::parent)
                .map(Path::to_path_buf)
        };

        if is_root_dir(dir) {
            return from_entries();
        }
        if let Some(mapped) = self.mapper.map_with_table(dir, false)
            && mapped.exists()
        {
            return Some(mapped);
        }
        let direct = self.mapper.upstream_root().join(dir);
        if direct.exists() {
            return Some(direct);
        }
        from_entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::runner::BuiltinDiff;
    use corepkgs_test_utils::TreeFixture;
    use pretty_assertions::assert_eq;

    const STAMP: &str = "2024-01-01 00:00:00.000000";

    fn entry(fixture: &TreeFixture, rel: &str, upstream_rel: &str) -> DiffEntry {
        DiffEntry {
            rel_path: rel.to_string(),
            local: Some(fixture.local().join(rel)),
            upstream: Some(fixture.upstream().join(upstream_rel)),
        }
    }

    fn generate(fixture: &TreeFixture, dir: &str, entries: &[DiffEntry]) -> Option<GeneratedPatch> {
        let config = SyncConfig::default();
        let mapper = PathMapper::new(&config, &fixture.local(), &fixture.upstream());
        let generator = PatchGenerator::new(&config, &mapper, &BuiltinDiff, STAMP);
        generator.generate(dir, entries).unwrap()
    }

    #[test]
    fn test_patch_file_names() {
        assert_eq!(patch_file_name("."), "root.patch");
        assert_eq!(patch_file_name("pkgs/rust"), "pkgs_rust.patch");
        assert_eq!(patch_file_name("stdenv"), "stdenv.patch");
    }

    #[test]
    fn test_skip_root_level() {
        let fixture = TreeFixture::new()
            .with_local("release.nix", "old")
            .with_upstream("pkgs/top-level/release.nix", "new");
        let entries = [entry(&fixture, "release.nix", "pkgs/top-level/release.nix")];
        assert_eq!(generate(&fixture, ".", &entries), None);
    }

    #[test]
    fn test_skip_when_local_dir_missing() {
        let fixture = TreeFixture::new().with_upstream("pkgs/stdenv/linux/a.nix", "new");
        let entries = [entry(&fixture, "stdenv/linux/a.nix", "pkgs/stdenv/linux/a.nix")];
        assert_eq!(generate(&fixture, "stdenv/linux", &entries), None);
    }

    #[test]
    fn test_skip_when_upstream_dir_missing() {
        let fixture = TreeFixture::new().with_local("stdenv/linux/a.nix", "old");
        let entries = [DiffEntry {
            rel_path: "stdenv/linux/a.nix".to_string(),
            local: Some(fixture.local().join("stdenv/linux/a.nix")),
            upstream: None,
        }];
        assert_eq!(generate(&fixture, "stdenv/linux", &entries), None);
    }

    #[test]
    fn test_skip_when_local_path_is_file() {
        let fixture = TreeFixture::new()
            .with_local("stdenv/linux", "not a directory")
            .with_upstream("pkgs/stdenv/linux/a.nix", "new");
        let entries = [entry(&fixture, "stdenv/linux/a.nix", "pkgs/stdenv/linux/a.nix")];
        assert_eq!(generate(&fixture, "stdenv/linux", &entries), None);
    }

    #[test]
    fn test_skip_when_upstream_path_is_file() {
        let fixture = TreeFixture::new()
            .with_local("stdenv/linux/a.nix", "old")
            .with_upstream("pkgs/stdenv/linux", "not a directory");
        let entries = [entry(&fixture, "stdenv/linux/a.nix", "pkgs/stdenv/linux/a.nix")];
        assert_eq!(generate(&fixture, "stdenv/linux", &entries), None);
    }

    #[test]
    fn test_header_block() {
        let fixture = TreeFixture::new()
            .with_local("stdenv/linux/a.nix", "version = 1;\n")
            .with_upstream("pkgs/stdenv/linux/a.nix", "version = 2;\n");
        let entries = [entry(&fixture, "stdenv/linux/a.nix", "pkgs/stdenv/linux/a.nix")];

        let patch = generate(&fixture, "stdenv/linux", &entries).unwrap();
        assert_eq!(patch.path, fixture.local().join("patches/stdenv_linux.patch"));

        let content = fixture.read_local("patches/stdenv_linux.patch");
        let header: Vec<&str> = content.lines().take(9).collect();
        assert_eq!(
            header,
            vec![
                "# Patch for directory: stdenv/linux",
                "# Source directory in nixpkgs: pkgs/stdenv/linux",
                "# Generated: 2024-01-01 00:00:00.000000",
                "# Files in directory: 1",
                "#",
                "# To apply from corepkgs root:",
                "#   patch -p1 < patches/stdenv_linux.patch",
                "#",
                "diff -urN a/stdenv/linux b/stdenv/linux",
            ]
        );
        assert!(content.contains("--- a/stdenv/linux/a.nix\t"));
        assert!(content.contains("+++ b/stdenv/linux/a.nix\t"));
        assert!(content.ends_with("+version = 2;\n"));
    }

    #[test]
    fn test_maintainers_only_yields_no_patch() {
        let fixture = TreeFixture::new()
            .with_local("stdenv/linux/a.nix", "{\n  maintainers = [ ];\n}\n")
            .with_upstream(
                "pkgs/stdenv/linux/a.nix",
                "{\n  maintainers = with maintainers; [ globin ];\n}\n",
            );
        let entries = [entry(&fixture, "stdenv/linux/a.nix", "pkgs/stdenv/linux/a.nix")];

        assert_eq!(generate(&fixture, "stdenv/linux", &entries), None);
        fixture.assert_local_not_exists("patches/stdenv_linux.patch");
    }

    #[test]
    fn test_resolve_falls_back_to_first_entry_parent() {
        let fixture = TreeFixture::new()
            .with_local("odd/place/a.nix", "old")
            .with_upstream("elsewhere/deep/a.nix", "new");
        let config = SyncConfig::default();
        let mapper = PathMapper::new(&config, &fixture.local(), &fixture.upstream());
        let generator = PatchGenerator::new(&config, &mapper, &BuiltinDiff, STAMP);
        let entries = [entry(&fixture, "odd/place/a.nix", "elsewhere/deep/a.nix")];

        assert_eq!(
            generator.resolve_upstream_dir("odd/place", &entries),
            Some(fixture.upstream().join("elsewhere/deep"))
        );
    }
}
