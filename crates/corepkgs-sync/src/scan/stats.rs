//! Counters and per-directory findings of one comparison run

use std::collections::BTreeMap;
use std::path::PathBuf;

use corepkgs_fs::{NormalizedPath, ROOT_DIR};
use serde::Serialize;

/// A file that differs between the trees, or exists only upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffEntry {
    /// Path relative to the corepkgs root.
    pub rel_path: String,
    /// Absolute local file; `None` for files that only exist upstream.
    pub local: Option<PathBuf>,
    /// Absolute upstream file.
    pub upstream: Option<PathBuf>,
}

/// Aggregate result of walking and discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub processed: usize,
    pub found: usize,
    pub different: usize,
    pub ignored: usize,
    pub not_found: usize,
    pub not_found_list: Vec<String>,
    pub new_files: usize,
    pub new_files_list: Vec<String>,
    /// Findings grouped by owning directory; root files use `"."`.
    pub directories_with_diffs: BTreeMap<String, Vec<DiffEntry>>,
}

impl DiffStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_ignored(&mut self) {
        self.ignored += 1;
    }

    pub fn record_not_found(&mut self, rel_path: &str) {
        self.not_found += 1;
        self.not_found_list.push(rel_path.to_string());
    }

    /// Record a local file whose upstream counterpart has different content.
    pub fn record_different(&mut self, rel_path: &str, local: PathBuf, upstream: PathBuf) {
        self.different += 1;
        self.push_entry(DiffEntry {
            rel_path: rel_path.to_string(),
            local: Some(local),
            upstream: Some(upstream),
        });
    }

    /// Record an upstream file with no local counterpart.
    pub fn record_new_file(&mut self, rel_path: &str, upstream: PathBuf) {
        self.new_files += 1;
        self.new_files_list.push(rel_path.to_string());
        self.push_entry(DiffEntry {
            rel_path: rel_path.to_string(),
            local: None,
            upstream: Some(upstream),
        });
    }

    fn push_entry(&mut self, entry: DiffEntry) {
        let dir = directory_of(&entry.rel_path);
        self.directories_with_diffs.entry(dir).or_default().push(entry);
    }

    /// Whether a path was recorded as new.
    pub fn is_new(&self, rel_path: &str) -> bool {
        self.new_files_list.iter().any(|p| p == rel_path)
    }
}

/// Directory that owns a relative file path; `"."` for top-level files.
pub fn directory_of(rel_path: &str) -> String {
    NormalizedPath::new(rel_path).directory()
}

/// Whether a directory key is the root sentinel.
pub fn is_root_dir(dir: &str) -> bool {
    dir == ROOT_DIR
}
