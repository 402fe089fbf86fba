//! SyncEngine implementation
//!
//! The SyncEngine runs one complete comparison between a corepkgs checkout
//! and a nixpkgs checkout: classify local files, discover new upstream
//! files, regenerate the per-directory patches and write the index.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::config::SyncConfig;
use crate::ignore::IgnoreClassifier;
use crate::mapper::PathMapper;
use crate::patch::{
    BuiltinDiff, DiffRunner, GeneratedPatch, INDEX_FILE, PatchGenerator, SystemDiff,
    patch_file_name, read_index_patches, write_index,
};
use crate::scan::{DiffStats, NewFileDiscovery, TreeWalker};
use crate::{Error, Result};

/// Timestamp format used in patch headers and the index.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Which diff implementation produces directory diffs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiffBackend {
    /// The `diff` executable on `PATH`
    #[default]
    System,
    /// The in-process implementation
    Builtin,
}

/// Options for a sync run
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Written into every patch header and the index. Runs with the same
    /// value over unchanged trees produce identical files.
    pub generated_at: DateTime<Local>,
    pub diff: DiffBackend,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            generated_at: Local::now(),
            diff: DiffBackend::default(),
        }
    }
}

/// Report from a sync run
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub stats: DiffStats,
    /// Patches written by this run
    pub patches: Vec<GeneratedPatch>,
    pub patches_dir: PathBuf,
    pub index_path: PathBuf,
}

/// Engine for synchronizing corepkgs against nixpkgs
pub struct SyncEngine {
    config: SyncConfig,
    local_root: PathBuf,
    upstream_root: PathBuf,
}

impl SyncEngine {
    /// Create a new SyncEngine
    ///
    /// # Errors
    ///
    /// Returns an error if either root is not a directory.
    pub fn new(config: SyncConfig, local_root: &Path, upstream_root: &Path) -> Result<Self> {
        for root in [local_root, upstream_root] {
            if !root.is_dir() {
                return Err(Error::NotADirectory {
                    path: root.to_path_buf(),
                });
            }
        }

        Ok(Self {
            config,
            local_root: local_root.to_path_buf(),
            upstream_root: upstream_root.to_path_buf(),
        })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Directory patches are written to
    pub fn patches_dir(&self) -> PathBuf {
        self.local_root.join(&self.config.patches_dir)
    }

    /// Compare both trees without writing anything.
    pub fn scan(&self) -> Result<DiffStats> {
        let mapper = PathMapper::new(&self.config, &self.local_root, &self.upstream_root);
        let mut stats = DiffStats::new();

        TreeWalker::new(&mapper, IgnoreClassifier::new(&self.config)).walk(&mut stats)?;
        NewFileDiscovery::new(&self.config, &mapper).discover(&mut stats)?;

        Ok(stats)
    }

    /// Run a full sync.
    ///
    /// Patches listed in the index of the previous run are removed, together
    /// with that index, before scanning. Other `*.patch` files in the patches
    /// directory are left alone.
    pub fn run(&self, options: &SyncOptions) -> Result<SyncReport> {
        let patches_dir = self.patches_dir();
        tracing::info!(
            corepkgs = %self.local_root.display(),
            nixpkgs = %self.upstream_root.display(),
            patches = %patches_dir.display(),
            "Starting sync"
        );

        fs::create_dir_all(&patches_dir).map_err(|e| Error::io(&patches_dir, e))?;
        self.remove_previous_output(&patches_dir)?;

        let stats = self.scan()?;

        let generated_at = options.generated_at.format(TIMESTAMP_FORMAT).to_string();
        let system = SystemDiff::default();
        let runner: &dyn DiffRunner = match options.diff {
            DiffBackend::System => &system,
            DiffBackend::Builtin => &BuiltinDiff,
        };
        let mapper = PathMapper::new(&self.config, &self.local_root, &self.upstream_root);
        let generator = PatchGenerator::new(&self.config, &mapper, runner, generated_at.as_str());
        let patches = generator.generate_all(&stats.directories_with_diffs)?;

        let names: Vec<String> = patches.iter().map(|p| patch_file_name(&p.dir)).collect();
        let index_path = write_index(
            &patches_dir,
            &stats,
            &names,
            &generated_at,
            self.config.index_list_limit,
        )?;

        tracing::info!(
            processed = stats.processed,
            found = stats.found,
            different = stats.different,
            not_found = stats.not_found,
            new_files = stats.new_files,
            patches = patches.len(),
            "Sync complete"
        );

        Ok(SyncReport {
            stats,
            patches,
            patches_dir,
            index_path,
        })
    }

    fn remove_previous_output(&self, patches_dir: &Path) -> Result<()> {
        for name in read_index_patches(patches_dir)? {
            let path = patches_dir.join(&name);
            if !path.is_file() {
                continue;
            }
            fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
            tracing::debug!(patch = %name, "Removed previous patch");
        }

        let index = patches_dir.join(INDEX_FILE);
        if index.is_file() {
            fs::remove_file(&index).map_err(|e| Error::io(&index, e))?;
        }
        Ok(())
    }
}
