//! Built-in tables for the corepkgs/nixpkgs layout

/// Local top-level directories scanned for upstream additions.
pub const MONITORED_ROOTS: &[&str] = &[
    "build-support",
    "common-updater",
    "os-specific",
    "stdenv",
    "systems",
];

/// Directories whose own new entries are not reported.
pub const IGNORE_NEW_DIRS: &[&str] = &["build-support", "os-specific", "os-specific/linux"];

pub const IGNORE_DIRS: &[&str] = &[
    "apparmor",
    "docs",
    "maintainers",
    "pkgs-many",
    "patches",
    "pkgs/rust",
    "stdenv/generic",
];

pub const IGNORE_FILES: &[&str] = &[
    "README.md",
    "LICENSE",
    ".gitignore",
    "default.nix",
    "lib.nix",
    "pins.nix",
    "top-level.nix",
    "stdenv/aliases.nix",
    "stdenv/config.nix",
    "stdenv/generic/default.nix",
];

/// Local prefix to upstream prefix, in lookup order.
pub const PATH_MAPPINGS: &[(&str, &str)] = &[
    ("build-support", "pkgs/build-support"),
    ("common-updater", "pkgs/common-updater"),
    ("os-specific", "pkgs/os-specific"),
    ("perl/buildperlpackage.nix", "pkgs/development/perl-modules/generic"),
    ("perl/perl-packages.nix", "pkgs/top-level/perl-packages.nix"),
    ("python", "pkgs/development/interpreters/python"),
    ("python/pkgs", "pkgs/development/python-modules"),
    ("pkgs", "pkgs/by-name"),
    ("pkgs/automake", "pkgs/development/tools/misc/automake"),
    ("pkgs/bash", "pkgs/shells/bash"),
    ("pkgs/binutils", "pkgs/development/tools/misc/binutils"),
    ("pkgs/boost", "pkgs/development/libraries/boost"),
    ("pkgs/dotnet", "pkgs/development/compilers/dotnet"),
    ("pkgs/gcc", "pkgs/development/compilers/gcc"),
    ("pkgs/glibc", "pkgs/development/libraries/glibc"),
    (
        "pkgs/gobject-introspection",
        "pkgs/development/libraries/gobject-introspection",
    ),
    ("pkgs/llvm", "pkgs/development/compilers/llvm"),
    ("pkgs/openssh", "pkgs/tools/networking/openssh"),
    ("pkgs/rust", "pkgs/development/compilers/rust"),
    ("pkgs/systemd", "pkgs/os-specific/linux/systemd"),
    ("pkgs/texlive", "pkgs/tools/typesetting/tex/texlive"),
    ("pkgs/perl", "pkgs/development/interpreters/perl"),
    ("pkgs/xorg", "pkgs/servers/x11/xorg"),
    ("pkgs/javaPackages/openjdk", "pkgs/development/compilers/openjdk"),
    ("stdenv", "pkgs/stdenv"),
    ("stdenv/impure.nix", "pkgs/top-level/default.nix"),
    ("systems", "lib/systems"),
    ("test", "nixos/tests"),
    ("test/cc-wrapper", "pkgs/test/cc-wrapper"),
    ("test/haskell", "pkgs/test/haskell"),
    ("test/dotnet", "pkgs/test/dotnet"),
    ("test/stdenv", "pkgs/test/stdenv"),
    ("test/stdenv-inputs", "pkgs/test/stdenv-inputs"),
    ("test/make-binary-wrapper", "pkgs/test/make-binary-wrapper"),
    (
        "test/make-hardcode-gsettings-patch",
        "pkgs/test/make-hardcode-gsettings-patch",
    ),
    ("release.nix", "pkgs/top-level/release.nix"),
    ("unixtools.nix", "pkgs/top-level/unixtools.nix"),
];

pub const PATCHES_DIR: &str = "patches";

/// Entries listed per section of `index.txt` before truncation.
pub const INDEX_LIST_LIMIT: usize = 500;

/// Configuration file looked up below the corepkgs root.
pub const CONFIG_FILE: &str = "maintainers/sync.toml";
