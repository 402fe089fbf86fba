//! Tests for loading sync configuration files

use std::fs;

use assert_fs::TempDir;
use assert_fs::prelude::*;
use corepkgs_sync::config::{MappingRule, defaults};
use corepkgs_sync::{Error, SyncConfig};
use pretty_assertions::assert_eq;

#[test]
fn test_partial_toml_keeps_builtin_sections() {
    let temp = TempDir::new().unwrap();
    let file = temp.child("sync.toml");
    file.write_str(
        r#"
patches_dir = "out"

[[mappings]]
local = "stdenv"
upstream = "pkgs/stdenv"

[[mappings]]
local = "systems"
upstream = "lib/systems"
"#,
    )
    .unwrap();

    let config = SyncConfig::load(file.path()).unwrap();

    assert_eq!(config.patches_dir, "out");
    assert_eq!(
        config.mappings.rules(),
        &[
            MappingRule::new("stdenv", "pkgs/stdenv"),
            MappingRule::new("systems", "lib/systems"),
        ]
    );
    assert_eq!(config.ignore, SyncConfig::default().ignore);
    assert_eq!(config.index_list_limit, defaults::INDEX_LIST_LIMIT);
}

#[test]
fn test_mapping_order_is_preserved() {
    let temp = TempDir::new().unwrap();
    let file = temp.child("sync.json");
    file.write_str(
        r#"{"mappings": [
            {"local": "pkgs", "upstream": "pkgs/by-name"},
            {"local": "pkgs/bash", "upstream": "pkgs/shells/bash"}
        ]}"#,
    )
    .unwrap();

    let config = SyncConfig::load(file.path()).unwrap();
    let locals: Vec<&str> = config
        .mappings
        .rules()
        .iter()
        .map(|r| r.local.as_str())
        .collect();
    assert_eq!(locals, vec!["pkgs", "pkgs/bash"]);
}

#[test]
fn test_default_config_round_trips_through_toml() {
    let config = SyncConfig::default();
    let text = toml::to_string(&config).unwrap();
    let parsed: SyncConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_resolve_without_file_uses_builtin_tables() {
    let temp = TempDir::new().unwrap();
    let config = SyncConfig::resolve(None, temp.path()).unwrap();
    assert_eq!(config, SyncConfig::default());
}

#[test]
fn test_explicit_path_wins_over_checkout_file() {
    let temp = TempDir::new().unwrap();
    temp.child("maintainers/sync.toml")
        .write_str("patches_dir = \"from-checkout\"\n")
        .unwrap();
    let explicit = temp.child("other.yaml");
    explicit.write_str("patches_dir: from-explicit\n").unwrap();

    let config = SyncConfig::resolve(Some(explicit.path()), temp.path()).unwrap();
    assert_eq!(config.patches_dir, "from-explicit");
}

#[test]
fn test_invalid_file_is_an_error() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("sync.toml");
    fs::write(&file, "mappings = 3\n").unwrap();

    let err = SyncConfig::load(&file).unwrap_err();
    assert!(matches!(err, Error::Fs(_)), "got: {err:?}");
}
