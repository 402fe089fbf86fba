//! Classification of every local file against its upstream counterpart

use std::path::Path;

use corepkgs_fs::{NormalizedPath, TreeMarker, io::files_identical};
use walkdir::WalkDir;

use crate::ignore::IgnoreClassifier;
use crate::mapper::PathMapper;
use crate::scan::DiffStats;
use crate::{Error, Result};

const PROGRESS_INTERVAL: usize = 100;

/// Walks the local tree in name order and fills a [`DiffStats`].
pub struct TreeWalker<'a> {
    mapper: &'a PathMapper<'a>,
    ignore: IgnoreClassifier<'a>,
}

impl<'a> TreeWalker<'a> {
    pub fn new(mapper: &'a PathMapper<'a>, ignore: IgnoreClassifier<'a>) -> Self {
        Self { mapper, ignore }
    }

    /// Classify every regular file below the local root.
    ///
    /// Ignored files only bump the ignored counter. Everything else is
    /// counted as processed and is either not found upstream, identical, or
    /// recorded as different under its owning directory.
    pub fn walk(&self, stats: &mut DiffStats) -> Result<()> {
        let root = self.mapper.local_root();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0 || !TreeMarker::is_excluded(Path::new(entry.file_name()))
            });

        for entry in walker {
            let entry = entry.map_err(|source| Error::Walk {
                root: root.to_path_buf(),
                source,
            })?;
            if !entry.path().is_file() {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(root) else {
                continue;
            };
            let rel_path = NormalizedPath::new(rel);
            self.classify(rel_path.as_str(), stats);
        }

        tracing::info!(
            processed = stats.processed,
            found = stats.found,
            different = stats.different,
            not_found = stats.not_found,
            ignored = stats.ignored,
            "Finished comparing local files"
        );
        Ok(())
    }

    fn classify(&self, rel_path: &str, stats: &mut DiffStats) {
        if self.ignore.should_ignore(rel_path) {
            stats.record_ignored();
            return;
        }

        stats.processed += 1;
        match self.mapper.map(rel_path) {
            Some(upstream) => {
                stats.found += 1;
                let local = self.mapper.local_root().join(rel_path);
                if !files_identical(&upstream, &local) {
                    tracing::debug!(path = rel_path, upstream = %upstream.display(), "Files differ");
                    stats.record_different(rel_path, local, upstream);
                }
            }
            None => {
                tracing::debug!(path = rel_path, "No upstream counterpart");
                stats.record_not_found(rel_path);
            }
        }

        if stats.processed % PROGRESS_INTERVAL == 0 {
            tracing::info!(
                processed = stats.processed,
                found = stats.found,
                different = stats.different,
                not_found = stats.not_found,
                "Comparing files"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncConfig;
    use corepkgs_test_utils::TreeFixture;
    use pretty_assertions::assert_eq;

    fn run(fixture: &TreeFixture, config: &SyncConfig) -> DiffStats {
        let mapper = PathMapper::new(config, &fixture.local(), &fixture.upstream());
        let walker = TreeWalker::new(&mapper, IgnoreClassifier::new(config));
        let mut stats = DiffStats::new();
        walker.walk(&mut stats).unwrap();
        stats
    }

    #[test]
    fn test_classifies_identical_different_and_missing() {
        let fixture = TreeFixture::new()
            .with_local("stdenv/linux/same.nix", "same")
            .with_upstream("pkgs/stdenv/linux/same.nix", "same")
            .with_local("stdenv/linux/changed.nix", "old")
            .with_upstream("pkgs/stdenv/linux/changed.nix", "new")
            .with_local("stdenv/linux/local-only.nix", "mine");

        let stats = run(&fixture, &SyncConfig::default());

        assert_eq!(stats.processed, 3);
        assert_eq!(stats.found, 2);
        assert_eq!(stats.different, 1);
        assert_eq!(stats.not_found_list, vec!["stdenv/linux/local-only.nix"]);
        let entries = &stats.directories_with_diffs["stdenv/linux"];
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].rel_path, "stdenv/linux/changed.nix");
    }

    #[test]
    fn test_ignored_paths_only_count() {
        let fixture = TreeFixture::new()
            .with_local("docs/manual.md", "x")
            .with_local("README.md", "x")
            .with_local("patches/old.patch", "x");

        let stats = run(&fixture, &SyncConfig::default());

        assert_eq!(stats.ignored, 3);
        assert_eq!(stats.processed, 0);
        assert!(stats.directories_with_diffs.is_empty());
    }

    #[test]
    fn test_git_and_build_results_are_skipped() {
        let fixture = TreeFixture::new()
            .with_local(".git/config", "x")
            .with_local("result/bin/tool", "x")
            .with_local("result-dev/include/x.h", "x")
            .with_local("systems/doubles.nix", "x");

        let stats = run(&fixture, &SyncConfig::default());

        assert_eq!(stats.processed + stats.ignored, 1);
        assert_eq!(stats.not_found_list, vec!["systems/doubles.nix"]);
    }

    #[test]
    fn test_root_files_use_root_sentinel() {
        let fixture = TreeFixture::new()
            .with_local("release.nix", "old")
            .with_upstream("pkgs/top-level/release.nix", "new");

        let stats = run(&fixture, &SyncConfig::default());

        assert!(stats.directories_with_diffs.contains_key("."));
    }
}
