//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// corepkgs - Keep corepkgs in step with nixpkgs
#[derive(Parser, Debug)]
#[command(name = "corepkgs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Generate per-directory patches between corepkgs and nixpkgs
    ///
    /// Patches and an index.txt summary are written to the patches
    /// directory of the corepkgs checkout.
    ///
    /// Examples:
    ///   corepkgs sync
    ///   corepkgs sync --nixpkgs ~/src/nixpkgs --corepkgs ~/src/corepkgs
    Sync {
        /// Path to the corepkgs checkout
        #[arg(long, default_value = ".")]
        corepkgs: PathBuf,

        /// Path to the nixpkgs checkout (default: ../nixpkgs next to corepkgs)
        #[arg(long, env = "NIXPKGS_ROOT")]
        nixpkgs: Option<PathBuf>,

        /// Sync configuration file (default: maintainers/sync.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Compare directories in-process instead of running `diff`
        #[arg(long)]
        builtin_diff: bool,
    },

    /// Copy packages from nixpkgs into corepkgs
    ///
    /// By default copies pkgs/by-name/<xx>/<name> to pkgs/<name> and
    /// renames package.nix to default.nix.
    Import {
        /// Package name(s) to import
        #[arg(short, long = "name", required = true, num_args = 1..)]
        names: Vec<String>,

        /// Import from pkgs/development/python-modules/<name> into python/pkgs/<name>
        #[arg(long)]
        python: bool,

        /// Path to the nixpkgs checkout (default: ../nixpkgs next to corepkgs)
        #[arg(long, env = "NIXPKGS_ROOT")]
        nixpkgs_root: Option<PathBuf>,

        /// Path to the corepkgs checkout
        #[arg(long, default_value = ".")]
        corepkgs: PathBuf,

        /// Overwrite the destination directory if it already exists
        #[arg(long)]
        force: bool,
    },

    /// Write the built-in sync configuration to a file for editing
    ///
    /// The file lands at maintainers/sync.toml in the corepkgs checkout
    /// unless --output is given; .json, .yaml and .yml select other formats.
    InitConfig {
        /// Path to the corepkgs checkout
        #[arg(long, default_value = ".")]
        corepkgs: PathBuf,

        /// Destination file (default: maintainers/sync.toml)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Empty maintainer lists and drop team assignments in .nix files
    Sanitize {
        /// Files or directories to process
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Show which files would change without writing them
        #[arg(long)]
        dry_run: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sync_defaults() {
        let cli = Cli::try_parse_from(["corepkgs", "sync"]).unwrap();
        assert!(!cli.verbose);
        assert_eq!(
            cli.command,
            Commands::Sync {
                corepkgs: PathBuf::from("."),
                nixpkgs: std::env::var_os("NIXPKGS_ROOT").map(PathBuf::from),
                config: None,
                builtin_diff: false,
            }
        );
    }

    #[test]
    fn parse_import_multiple_names() {
        let cli = Cli::try_parse_from([
            "corepkgs", "-v", "import", "--name", "hello", "jq", "--python", "--force",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Import {
                names,
                python,
                force,
                ..
            } => {
                assert_eq!(names, vec!["hello", "jq"]);
                assert!(python);
                assert!(force);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_import_requires_name() {
        assert!(Cli::try_parse_from(["corepkgs", "import"]).is_err());
    }

    #[test]
    fn parse_sanitize_paths() {
        let cli = Cli::try_parse_from(["corepkgs", "sanitize", "pkgs", "stdenv", "--dry-run"])
            .unwrap();
        assert_eq!(
            cli.command,
            Commands::Sanitize {
                paths: vec![PathBuf::from("pkgs"), PathBuf::from("stdenv")],
                dry_run: true,
            }
        );
    }

    #[test]
    fn parse_init_config() {
        let cli = Cli::try_parse_from(["corepkgs", "init-config", "-o", "sync.json", "--force"])
            .unwrap();
        assert_eq!(
            cli.command,
            Commands::InitConfig {
                corepkgs: PathBuf::from("."),
                output: Some(PathBuf::from("sync.json")),
                force: true,
            }
        );
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
