//! Path mapping between the corepkgs and nixpkgs trees
//!
//! Forward lookup tries, in order: the identical relative path upstream,
//! the flattened by-name convention, direct substitution under the upstream
//! package directory, and finally the prefix-rewrite table. Reverse lookup
//! resolves an upstream path back to an existing local file.

use std::path::{Path, PathBuf};

use crate::config::{FlattenedLayout, MappingTable, SyncConfig, join_rel};

/// Resolves relative paths across the two trees.
///
/// Lookups are read-only; the only filesystem access is existence checks.
#[derive(Debug, Clone)]
pub struct PathMapper<'a> {
    mappings: &'a MappingTable,
    layout: &'a FlattenedLayout,
    local_root: PathBuf,
    upstream_root: PathBuf,
}

impl<'a> PathMapper<'a> {
    pub fn new(config: &'a SyncConfig, local_root: &Path, upstream_root: &Path) -> Self {
        Self {
            mappings: &config.mappings,
            layout: &config.layout,
            local_root: local_root.to_path_buf(),
            upstream_root: upstream_root.to_path_buf(),
        }
    }

    pub fn local_root(&self) -> &Path {
        &self.local_root
    }

    pub fn upstream_root(&self) -> &Path {
        &self.upstream_root
    }

    /// Upstream file corresponding to a local relative path.
    pub fn map(&self, rel_path: &str) -> Option<PathBuf> {
        let exact = self.upstream_root.join(rel_path);
        if exact.is_file() {
            return Some(exact);
        }

        if let Some(rest) = rel_path
            .strip_prefix(self.layout.local_dir.as_str())
            .and_then(|r| r.strip_prefix('/'))
        {
            let parts: Vec<&str> = rest.split('/').collect();
            if let [name, file] = parts.as_slice()
                && *file == self.layout.local_file
            {
                let by_name = self
                    .upstream_root
                    .join(&self.layout.upstream_bucket)
                    .join(FlattenedLayout::shard(name))
                    .join(name)
                    .join(&self.layout.upstream_file);
                if by_name.is_file() {
                    return Some(by_name);
                }
            }

            let direct = self.upstream_root.join(&self.layout.upstream_dir).join(rest);
            if direct.is_file() {
                return Some(direct);
            }
        }

        self.map_with_table(rel_path, true)
    }

    /// Rewrite a local path through the mapping table.
    ///
    /// With `check_file` the first candidate that is an existing file wins
    /// and later rules are tried when a candidate is missing. Without it the
    /// first matching rule decides, whether or not its target exists.
    pub fn map_with_table(&self, rel_path: &str, check_file: bool) -> Option<PathBuf> {
        self.mappings
            .forward_candidates(rel_path)
            .map(|(_, upstream_rel)| self.upstream_root.join(upstream_rel))
            .find(|candidate| !check_file || candidate.is_file())
    }

    /// Local relative path of an existing corepkgs file for an upstream path.
    pub fn reverse(&self, upstream_rel: &str) -> Option<String> {
        if self.local_root.join(upstream_rel).is_file() {
            return Some(upstream_rel.to_string());
        }

        for rule in self.mappings.rules() {
            let Some(suffix) = rule.upstream_suffix(upstream_rel) else {
                continue;
            };

            if self.layout.is_flattened_rule(rule) && !suffix.is_empty() {
                let parts: Vec<&str> = suffix.split('/').collect();
                if parts.len() >= 3 && parts[2] == self.layout.upstream_file {
                    let collapsed = format!(
                        "{}/{}/{}",
                        self.layout.local_dir, parts[1], self.layout.local_file
                    );
                    if self.local_root.join(&collapsed).is_file() {
                        return Some(collapsed);
                    }
                }
            }

            let mapped = join_rel(&rule.local, suffix);
            if self.local_root.join(&mapped).is_file() {
                return Some(mapped);
            }
        }

        None
    }
}
