use corepkgs_fs::{NormalizedPath, ROOT_DIR};
use rstest::rstest;

#[test]
fn test_normalize_forward_slashes() {
    let path = NormalizedPath::new("build-support/cc-wrapper");
    assert_eq!(path.as_str(), "build-support/cc-wrapper");
}

#[test]
fn test_normalize_backslashes_to_forward() {
    let path = NormalizedPath::new("build-support\\cc-wrapper\\default.nix");
    assert_eq!(path.as_str(), "build-support/cc-wrapper/default.nix");
}

#[test]
fn test_trailing_slash_dropped() {
    let path = NormalizedPath::new("pkgs/llvm/");
    assert_eq!(path.as_str(), "pkgs/llvm");
}

#[test]
fn test_join_paths() {
    let base = NormalizedPath::new("pkgs/by-name");
    assert_eq!(base.join("ll/llvm").as_str(), "pkgs/by-name/ll/llvm");
}

#[test]
fn test_join_onto_empty() {
    let base = NormalizedPath::new("");
    assert_eq!(base.join("stdenv").as_str(), "stdenv");
}

#[test]
fn test_join_empty_segment_is_identity() {
    let base = NormalizedPath::new("stdenv");
    assert_eq!(base.join(""), base);
}

#[test]
fn test_parent() {
    let path = NormalizedPath::new("build-support/cc-wrapper/default.nix");
    assert_eq!(path.parent().unwrap().as_str(), "build-support/cc-wrapper");
}

#[test]
fn test_file_name() {
    let path = NormalizedPath::new("pkgs/llvm/package.nix");
    assert_eq!(path.file_name(), Some("package.nix"));
}

#[rstest]
#[case("file.nix", ROOT_DIR)]
#[case("build-support/cc-wrapper/default.nix", "build-support/cc-wrapper")]
#[case("a/b/c/d/file.nix", "a/b/c/d")]
fn test_directory(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(NormalizedPath::new(input).directory(), expected);
}

#[rstest]
#[case("pkgs/rust/binary.nix", "pkgs", true)]
#[case("pkgs", "pkgs", true)]
#[case("pkgs-many/foo.nix", "pkgs", false)]
#[case("docs", "docs/", true)]
#[case("stdenv/generic/default.nix", "stdenv/generic", true)]
#[case("stdenv/generic-extra.nix", "stdenv/generic", false)]
fn test_is_under(#[case] path: &str, #[case] prefix: &str, #[case] expected: bool) {
    assert_eq!(NormalizedPath::new(path).is_under(prefix), expected);
}

#[test]
fn test_strip_dir_prefix() {
    let path = NormalizedPath::new("pkgs/by-name/ll/llvm/package.nix");
    assert_eq!(path.strip_dir_prefix("pkgs/by-name"), Some("ll/llvm/package.nix"));
    assert_eq!(path.strip_dir_prefix("pkgs/by-name/ll/llvm/package.nix"), Some(""));
    assert_eq!(path.strip_dir_prefix("pkgs/by"), None);
}

#[test]
fn test_extension() {
    assert_eq!(NormalizedPath::new("maintainers/sync.toml").extension(), Some("toml"));
    assert_eq!(NormalizedPath::new(".gitignore").extension(), None);
}
