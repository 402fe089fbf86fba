use std::fs;

use corepkgs_sync::config::IgnoreRules;
use corepkgs_sync::{IgnoreClassifier, PathMapper, SyncConfig};
use proptest::prelude::*;
use tempfile::TempDir;

const SEGMENT: &str = "[a-z][a-z0-9-]{0,6}";

fn rel_path() -> impl Strategy<Value = String> {
    prop::collection::vec(SEGMENT, 1..4).prop_map(|parts| format!("{}.nix", parts.join("/")))
}

proptest! {
    #[test]
    fn test_nested_under_ignored_dir_is_ignored(
        dir in prop::sample::select(vec!["docs", "maintainers", "patches", "pkgs/rust", "stdenv/generic"]),
        rest in rel_path(),
    ) {
        let config = SyncConfig::default();
        let ignore = IgnoreClassifier::new(&config);
        let path = format!("{dir}/{rest}");

        prop_assert!(ignore.should_ignore(dir));
        prop_assert!(ignore.should_ignore(&path));
    }

    #[test]
    fn test_sibling_prefix_is_not_ignored(suffix in "[a-z]{1,4}", rest in rel_path()) {
        let config = SyncConfig {
            ignore: IgnoreRules { dirs: vec!["docs".to_string()], files: Vec::new() },
            ..SyncConfig::default()
        };
        let ignore = IgnoreClassifier::new(&config);

        // "docsx/..." shares a prefix with "docs" but is not nested below it
        let path = format!("docs{suffix}/{rest}");
        prop_assert!(!ignore.should_ignore(&path));
    }

    #[test]
    fn test_table_mapping_round_trips(suffix in rel_path()) {
        let dir = TempDir::new().unwrap();
        let local = dir.path().join("corepkgs");
        let upstream = dir.path().join("nixpkgs");
        let config = SyncConfig::default();

        let local_rel = format!("systems/{suffix}");
        let local_file = local.join(&local_rel);
        fs::create_dir_all(local_file.parent().unwrap()).unwrap();
        fs::write(&local_file, "x").unwrap();
        let upstream_file = upstream.join("lib/systems").join(&suffix);
        fs::create_dir_all(upstream_file.parent().unwrap()).unwrap();
        fs::write(&upstream_file, "x").unwrap();

        let mapper = PathMapper::new(&config, &local, &upstream);
        prop_assert_eq!(mapper.map(&local_rel), Some(upstream_file));

        let upstream_rel = format!("lib/systems/{suffix}");
        prop_assert_eq!(mapper.reverse(&upstream_rel), Some(local_rel));
    }
}
