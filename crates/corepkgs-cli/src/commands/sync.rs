//! Sync command implementation
//!
//! Compares the corepkgs checkout with nixpkgs and regenerates the patches
//! directory.

use std::path::Path;

use colored::Colorize;

use corepkgs_sync::{DiffBackend, SyncConfig, SyncEngine, SyncOptions};

use super::{resolve_nixpkgs, resolve_root};
use crate::error::Result;

/// Run the sync command
pub fn run_sync(
    corepkgs: &Path,
    nixpkgs: Option<&Path>,
    config: Option<&Path>,
    builtin_diff: bool,
) -> Result<()> {
    let corepkgs = resolve_root(corepkgs, "corepkgs")?;
    let nixpkgs = resolve_nixpkgs(nixpkgs, &corepkgs)?;
    let config = SyncConfig::resolve(config, &corepkgs)?;

    let engine = SyncEngine::new(config, &corepkgs, &nixpkgs)?;
    println!(
        "{} Comparing {} with {}",
        "=>".blue().bold(),
        corepkgs.display().to_string().cyan(),
        nixpkgs.display().to_string().cyan()
    );

    let options = SyncOptions {
        diff: if builtin_diff {
            DiffBackend::Builtin
        } else {
            DiffBackend::System
        },
        ..SyncOptions::default()
    };
    let report = engine.run(&options)?;
    let stats = &report.stats;

    if !stats.not_found_list.is_empty() {
        println!();
        println!(
            "{} Not-found files ({}):",
            "MISSING".yellow().bold(),
            stats.not_found_list.len()
        );
        let mut not_found: Vec<&String> = stats.not_found_list.iter().collect();
        not_found.sort();
        for path in not_found {
            println!("   {} {}", "-".yellow(), path);
        }
    }

    if !stats.new_files_list.is_empty() {
        println!();
        println!(
            "{} New files found ({}):",
            "NEW".green().bold(),
            stats.new_files_list.len()
        );
        let mut new_files: Vec<&String> = stats.new_files_list.iter().collect();
        new_files.sort();
        for path in new_files {
            println!("   {} {}", "+".green(), path);
        }
    }

    println!();
    println!(
        "{} Patch generation complete: {} patch(es) in {}",
        "OK".green().bold(),
        report.patches.len(),
        report.patches_dir.display()
    );
    println!("Index file: {}", report.index_path.display());
    println!(
        "Files processed: {}, found: {}, different: {}, not found: {}, new files: {}",
        stats.processed, stats.found, stats.different, stats.not_found, stats.new_files
    );

    Ok(())
}
