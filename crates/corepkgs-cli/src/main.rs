//! corepkgs CLI
//!
//! Command-line interface for generating nixpkgs patches, importing packages,
//! writing the sync configuration and sanitizing maintainer metadata.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose)?;
    tracing::debug!("Verbose mode enabled");

    execute_command(cli.command)
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Sync {
            corepkgs,
            nixpkgs,
            config,
            builtin_diff,
        } => commands::run_sync(&corepkgs, nixpkgs.as_deref(), config.as_deref(), builtin_diff),
        Commands::Import {
            names,
            python,
            nixpkgs_root,
            corepkgs,
            force,
        } => commands::run_import(&names, python, nixpkgs_root.as_deref(), &corepkgs, force),
        Commands::InitConfig {
            corepkgs,
            output,
            force,
        } => commands::run_init_config(&corepkgs, output.as_deref(), force),
        Commands::Sanitize { paths, dry_run } => commands::run_sanitize(&paths, dry_run),
    }
}
