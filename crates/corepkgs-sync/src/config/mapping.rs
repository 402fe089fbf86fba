//! Ordered prefix-rewrite table between local and upstream paths

use serde::{Deserialize, Serialize};

/// One prefix rewrite: `local` in corepkgs corresponds to `upstream` in nixpkgs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRule {
    pub local: String,
    pub upstream: String,
}

impl MappingRule {
    pub fn new(local: impl Into<String>, upstream: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            upstream: upstream.into(),
        }
    }

    /// Remainder of a local path below this rule's local prefix.
    pub fn local_suffix<'a>(&self, path: &'a str) -> Option<&'a str> {
        strip_prefix_segment(path, &self.local)
    }

    /// Remainder of an upstream path below this rule's upstream prefix.
    pub fn upstream_suffix<'a>(&self, path: &'a str) -> Option<&'a str> {
        strip_prefix_segment(path, &self.upstream)
    }
}

/// `Some("")` on equality, `Some(rest)` when `path` is nested below `prefix`.
fn strip_prefix_segment<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    if path == prefix {
        return Some("");
    }
    path.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('/'))
}

/// Join a prefix and a possibly empty suffix.
pub(crate) fn join_rel(prefix: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix}/{suffix}")
    }
}

/// First-match-wins list of [`MappingRule`]s.
///
/// ```
/// use corepkgs_sync::config::{MappingRule, MappingTable};
///
/// let table = MappingTable::new(vec![
///     MappingRule::new("stdenv", "pkgs/stdenv"),
///     MappingRule::new("systems", "lib/systems"),
/// ]);
/// assert_eq!(table.upstream_for("systems"), Some("lib/systems"));
/// assert!(table.upstream_for("systems/doubles.nix").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingTable {
    rules: Vec<MappingRule>,
}

impl MappingTable {
    pub fn new(rules: Vec<MappingRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[MappingRule] {
        &self.rules
    }

    /// Upstream prefix of the first rule whose local key is exactly `local`.
    pub fn upstream_for(&self, local: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|r| r.local == local)
            .map(|r| r.upstream.as_str())
    }

    /// Whether `local` is a key of the table.
    pub fn has_local_key(&self, local: &str) -> bool {
        self.upstream_for(local).is_some()
    }

    /// Rules whose local prefix covers `path`, in table order, with the
    /// upstream path each one rewrites it to.
    pub fn forward_candidates<'a>(
        &'a self,
        path: &'a str,
    ) -> impl Iterator<Item = (&'a MappingRule, String)> + 'a {
        self.rules.iter().filter_map(move |rule| {
            rule.local_suffix(path)
                .map(|suffix| (rule, join_rel(&rule.upstream, suffix)))
        })
    }
}

impl From<&[(&str, &str)]> for MappingTable {
    fn from(pairs: &[(&str, &str)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(local, upstream)| MappingRule::new(*local, *upstream))
                .collect(),
        )
    }
}
