//! Ignore classification for local paths

use corepkgs_fs::NormalizedPath;

use crate::config::{DiscoveryConfig, IgnoreRules, SyncConfig};

/// Decides which paths take no part in comparison or discovery.
#[derive(Debug, Clone, Copy)]
pub struct IgnoreClassifier<'a> {
    rules: &'a IgnoreRules,
    discovery: &'a DiscoveryConfig,
}

impl<'a> IgnoreClassifier<'a> {
    pub fn new(config: &'a SyncConfig) -> Self {
        Self {
            rules: &config.ignore,
            discovery: &config.discovery,
        }
    }

    /// Whether a local relative path is excluded from comparison.
    ///
    /// True when the path is an ignored directory or nested below one, or
    /// when its file name is an ignored file name.
    pub fn should_ignore(&self, rel_path: &str) -> bool {
        self.in_ignored_dir(rel_path) || self.is_ignored_file(rel_path)
    }

    /// Whether new files directly inside `root/sub` go unreported.
    ///
    /// `sub` is the subdirectory path relative to the monitored root.
    pub fn should_ignore_new_files_dir(&self, root: &str, sub: &str) -> bool {
        let rel_path = format!("{root}/{sub}");
        let listed = self.discovery.ignore_new_dirs.iter().any(|pattern| {
            if pattern.contains('/') {
                is_same_or_nested(&rel_path, pattern)
            } else {
                sub == pattern
            }
        });
        listed || self.in_ignored_dir(&rel_path)
    }

    fn in_ignored_dir(&self, rel_path: &str) -> bool {
        self.rules
            .dirs
            .iter()
            .any(|dir| is_same_or_nested(rel_path, dir))
    }

    fn is_ignored_file(&self, rel_path: &str) -> bool {
        let path = NormalizedPath::new(rel_path);
        let name = path.file_name().unwrap_or(rel_path);
        self.rules.files.iter().any(|file| name == file)
    }
}

fn is_same_or_nested(path: &str, dir: &str) -> bool {
    NormalizedPath::new(path).is_under(dir)
}
