//! Sync configuration
//!
//! All tables that drive a run live in one immutable [`SyncConfig`] value
//! passed by reference to every component. [`SyncConfig::default`] carries
//! the built-in corepkgs layout; a file at `maintainers/sync.toml` (or any
//! TOML, JSON or YAML file given explicitly) replaces individual sections.
//!
//! # Example file
//!
//! ```toml
//! patches_dir = "patches"
//! index_list_limit = 500
//!
//! [ignore]
//! dirs = ["docs", "maintainers", "patches"]
//! files = ["README.md", "LICENSE"]
//!
//! [discovery]
//! monitored_roots = ["stdenv", "systems"]
//! ignore_new_dirs = []
//!
//! [[mappings]]
//! local = "stdenv"
//! upstream = "pkgs/stdenv"
//! ```

pub mod defaults;
mod mapping;

use std::path::Path;

use corepkgs_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};

use crate::Result;

pub use mapping::{MappingRule, MappingTable};
pub(crate) use mapping::join_rel;

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Static ignore lists applied to every local relative path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreRules {
    /// Directories ignored together with everything nested below them.
    pub dirs: Vec<String>,
    /// File names matched against the last path component only.
    pub files: Vec<String>,
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self {
            dirs: to_strings(defaults::IGNORE_DIRS),
            files: to_strings(defaults::IGNORE_FILES),
        }
    }
}

/// Where new upstream files are looked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Top-level local directories scanned for upstream additions.
    pub monitored_roots: Vec<String>,
    /// Directories whose direct new files are not reported.
    ///
    /// An entry without `/` is compared with the subdirectory path relative
    /// to the monitored root, so it only matches a direct child of that root.
    /// An entry with `/` is a `root/sub` path and also covers what is nested
    /// below it.
    pub ignore_new_dirs: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            monitored_roots: to_strings(defaults::MONITORED_ROOTS),
            ignore_new_dirs: to_strings(defaults::IGNORE_NEW_DIRS),
        }
    }
}

impl DiscoveryConfig {
    pub fn ignores_new_in(&self, dir: &str) -> bool {
        self.ignore_new_dirs.iter().any(|d| d == dir)
    }
}

/// The flattened by-name package convention.
///
/// Local `pkgs/<name>/default.nix` corresponds to upstream
/// `pkgs/by-name/<shard>/<name>/package.nix`, where the shard is the
/// lowercased first two characters of the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenedLayout {
    /// Local directory holding one subdirectory per package.
    pub local_dir: String,
    /// Upstream sharded by-name directory.
    pub upstream_bucket: String,
    /// Upstream directory tried by direct substitution.
    pub upstream_dir: String,
    /// Package definition file name in corepkgs.
    pub local_file: String,
    /// Package definition file name in a by-name shard.
    pub upstream_file: String,
}

impl Default for FlattenedLayout {
    fn default() -> Self {
        Self {
            local_dir: "pkgs".to_string(),
            upstream_bucket: "pkgs/by-name".to_string(),
            upstream_dir: "pkgs".to_string(),
            local_file: "default.nix".to_string(),
            upstream_file: "package.nix".to_string(),
        }
    }
}

impl FlattenedLayout {
    /// Shard directory name for a package.
    pub fn shard(name: &str) -> String {
        name.chars().take(2).collect::<String>().to_lowercase()
    }

    /// Whether `rule` is the rule that maps the local package directory onto
    /// the by-name bucket.
    pub fn is_flattened_rule(&self, rule: &MappingRule) -> bool {
        rule.local == self.local_dir && rule.upstream == self.upstream_bucket
    }
}

/// Complete configuration of a sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub mappings: MappingTable,
    pub ignore: IgnoreRules,
    pub discovery: DiscoveryConfig,
    pub layout: FlattenedLayout,
    /// Output directory for patches, relative to the corepkgs root.
    pub patches_dir: String,
    /// Entries listed per section of `index.txt` before truncation.
    pub index_list_limit: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            mappings: MappingTable::from(defaults::PATH_MAPPINGS),
            ignore: IgnoreRules::default(),
            discovery: DiscoveryConfig::default(),
            layout: FlattenedLayout::default(),
            patches_dir: defaults::PATCHES_DIR.to_string(),
            index_list_limit: defaults::INDEX_LIST_LIMIT,
        }
    }
}

impl SyncConfig {
    /// Load a configuration file; the format follows its extension.
    ///
    /// Sections missing from the file keep their built-in values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has an unsupported
    /// extension or does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = ConfigStore::new().load(&NormalizedPath::new(path))?;
        tracing::debug!(
            path = %path.display(),
            mappings = config.mappings.rules().len(),
            "Loaded sync configuration"
        );
        Ok(config)
    }

    /// Write this configuration; the format follows the file extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        ConfigStore::new().save(&NormalizedPath::new(path), self)?;
        tracing::debug!(path = %path.display(), "Saved sync configuration");
        Ok(())
    }

    /// Configuration for a corepkgs checkout.
    ///
    /// An explicit path wins; otherwise `maintainers/sync.toml` below the
    /// root is used when present, and the built-in tables when it is not.
    pub fn resolve(explicit: Option<&Path>, corepkgs_root: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate = corepkgs_root.join(defaults::CONFIG_FILE);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            tracing::debug!("Using built-in sync configuration");
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_tables() {
        let config = SyncConfig::default();
        assert_eq!(config.mappings.rules().len(), defaults::PATH_MAPPINGS.len());
        assert_eq!(config.mappings.upstream_for("pkgs"), Some("pkgs/by-name"));
        assert_eq!(config.mappings.upstream_for("systems"), Some("lib/systems"));
        assert_eq!(config.patches_dir, "patches");
        assert_eq!(config.index_list_limit, 500);
        assert!(config.discovery.ignores_new_in("os-specific/linux"));
        assert!(!config.discovery.ignores_new_in("stdenv"));
    }

    #[test]
    fn test_flattened_rule_detected() {
        let config = SyncConfig::default();
        let flattened: Vec<&MappingRule> = config
            .mappings
            .rules()
            .iter()
            .filter(|r| config.layout.is_flattened_rule(r))
            .collect();
        assert_eq!(flattened.len(), 1);
        assert_eq!(flattened[0].local, "pkgs");
    }

    #[test]
    fn test_saved_config_loads_back() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("maintainers/sync.yaml");

        let config = SyncConfig {
            patches_dir: "out".to_string(),
            ..SyncConfig::default()
        };
        config.save(&path).unwrap();

        assert_eq!(SyncConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_shard_is_lowercased_prefix() {
        assert_eq!(FlattenedLayout::shard("Xaw3d"), "xa");
        assert_eq!(FlattenedLayout::shard("z"), "z");
    }
}
