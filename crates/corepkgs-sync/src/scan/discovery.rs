//! Discovery of files that exist upstream but not locally
//!
//! Only monitored roots are scanned. Below a root, directories that exist
//! locally are always descended into; directories that only exist upstream
//! are descended into unless new entries of their parent are ignored. A
//! missing local directory simply lists as empty, so nothing is ever created
//! in the local tree.

use std::fs;
use std::path::Path;

use corepkgs_fs::{NormalizedPath, TreeMarker};

use crate::config::SyncConfig;
use crate::ignore::IgnoreClassifier;
use crate::mapper::PathMapper;
use crate::scan::DiffStats;
use crate::{Error, Result};

/// Names of the direct children of one directory, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirListing {
    pub files: Vec<String>,
    pub dirs: Vec<String>,
}

impl DirListing {
    /// Whether any child, file or directory, has this name.
    pub fn contains(&self, name: &str) -> bool {
        self.files.iter().chain(&self.dirs).any(|n| n == name)
    }
}

/// Read access to directory trees.
pub trait TreeListing {
    /// Children of `dir`. A missing directory lists as empty.
    fn list(&self, dir: &Path) -> Result<DirListing>;

    fn is_dir(&self, path: &Path) -> bool;

    fn exists(&self, path: &Path) -> bool;
}

/// [`TreeListing`] backed by the real filesystem.
///
/// `.git` entries are never listed. Symlinks are classified by their target.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsListing;

impl TreeListing for FsListing {
    fn list(&self, dir: &Path) -> Result<DirListing> {
        if !dir.is_dir() {
            return Ok(DirListing::default());
        }

        let mut listing = DirListing::default();
        for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
            let entry = entry.map_err(|e| Error::io(dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if TreeMarker::GitDir.matches(&name) {
                continue;
            }
            let path = entry.path();
            if path.is_file() {
                listing.files.push(name);
            } else if path.is_dir() {
                listing.dirs.push(name);
            }
        }
        listing.files.sort();
        listing.dirs.sort();
        Ok(listing)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Finds upstream additions below the monitored roots.
pub struct NewFileDiscovery<'a, L: TreeListing = FsListing> {
    config: &'a SyncConfig,
    mapper: &'a PathMapper<'a>,
    ignore: IgnoreClassifier<'a>,
    listing: L,
}

impl<'a> NewFileDiscovery<'a, FsListing> {
    pub fn new(config: &'a SyncConfig, mapper: &'a PathMapper<'a>) -> Self {
        Self::with_listing(config, mapper, FsListing)
    }
}

impl<'a, L: TreeListing> NewFileDiscovery<'a, L> {
    pub fn with_listing(config: &'a SyncConfig, mapper: &'a PathMapper<'a>, listing: L) -> Self {
        Self {
            config,
            mapper,
            ignore: IgnoreClassifier::new(config),
            listing,
        }
    }

    /// Record every new upstream file under the monitored roots.
    pub fn discover(&self, stats: &mut DiffStats) -> Result<()> {
        tracing::info!("Checking for new files in monitored directories");

        for root in &self.config.discovery.monitored_roots {
            if !self.config.mappings.has_local_key(root) {
                tracing::debug!(root = %root, "Monitored root has no mapping; skipped");
                continue;
            }
            let Some(upstream_dir) = self.mapper.map_with_table(root, false) else {
                continue;
            };
            if !self.listing.is_dir(&upstream_dir) {
                continue;
            }
            let local_dir = self.mapper.local_root().join(root);
            if !self.listing.exists(&local_dir) {
                continue;
            }

            self.scan_root(root, &local_dir, &upstream_dir, stats)?;
        }

        tracing::info!(new_files = stats.new_files, "Finished new file discovery");
        Ok(())
    }

    fn scan_root(
        &self,
        root: &str,
        local_dir: &Path,
        upstream_dir: &Path,
        stats: &mut DiffStats,
    ) -> Result<()> {
        let root_ignored = self.config.discovery.ignores_new_in(root);
        let upstream = self.listing.list(upstream_dir)?;
        let local = self.listing.list(local_dir)?;

        if !root_ignored {
            for name in &upstream.files {
                self.consider(&upstream_dir.join(name), root, stats);
            }
        }

        for sub in &local.dirs {
            let skip = self.ignore.should_ignore_new_files_dir(root, sub);
            self.scan_dir(root, &format!("{root}/{sub}"), &upstream_dir.join(sub), skip, stats)?;
        }

        if !root_ignored {
            for sub in upstream.dirs.iter().filter(|d| !local.contains(d)) {
                self.scan_dir(root, &format!("{root}/{sub}"), &upstream_dir.join(sub), false, stats)?;
            }
        }
        Ok(())
    }

    /// Scan one directory below a monitored root.
    ///
    /// `skip_direct` suppresses the files directly inside it together with
    /// its upstream-only subdirectories; existing local subdirectories are
    /// still descended into.
    fn scan_dir(
        &self,
        root: &str,
        local_rel: &str,
        upstream_dir: &Path,
        skip_direct: bool,
        stats: &mut DiffStats,
    ) -> Result<()> {
        if !self.listing.is_dir(upstream_dir) {
            return Ok(());
        }

        let upstream = self.listing.list(upstream_dir)?;
        let local = self
            .listing
            .list(&self.mapper.local_root().join(local_rel))?;

        if !skip_direct {
            for name in &upstream.files {
                self.consider(&upstream_dir.join(name), local_rel, stats);
            }
        }

        for sub in &local.dirs {
            let nested_rel = format!("{local_rel}/{sub}");
            let below_root = NormalizedPath::new(&nested_rel)
                .strip_dir_prefix(root)
                .map(str::to_string)
                .unwrap_or_else(|| sub.clone());
            let skip = self.ignore.should_ignore_new_files_dir(root, &below_root);
            self.scan_dir(root, &nested_rel, &upstream_dir.join(sub), skip, stats)?;
        }

        if !skip_direct {
            for sub in upstream.dirs.iter().filter(|d| !local.contains(d)) {
                self.scan_dir(
                    root,
                    &format!("{local_rel}/{sub}"),
                    &upstream_dir.join(sub),
                    false,
                    stats,
                )?;
            }
        }
        Ok(())
    }

    /// Record `upstream_file` as new unless it is ignored or already present.
    fn consider(&self, upstream_file: &Path, local_dir_rel: &str, stats: &mut DiffStats) {
        let Ok(upstream_rel) = upstream_file.strip_prefix(self.mapper.upstream_root()) else {
            return;
        };
        let upstream_rel = NormalizedPath::new(upstream_rel);

        let local_rel = self.mapper.reverse(upstream_rel.as_str()).unwrap_or_else(|| {
            let name = upstream_rel.file_name().unwrap_or_default();
            NormalizedPath::new(local_dir_rel).join(name).as_str().to_string()
        });

        if self.ignore.should_ignore(&local_rel)
            || self.listing.exists(&self.mapper.local_root().join(&local_rel))
        {
            return;
        }

        tracing::info!(path = %local_rel, "Found new file");
        stats.record_new_file(&local_rel, upstream_file.to_path_buf());
    }
}
