//! Sanitize command implementation

use std::path::PathBuf;

use colored::Colorize;

use corepkgs_sync::sanitize_paths;

use crate::error::Result;

/// Run the sanitize command
pub fn run_sanitize(paths: &[PathBuf], dry_run: bool) -> Result<()> {
    let report = sanitize_paths(paths, dry_run)?;

    if report.processed == 0 {
        println!("No .nix files found to process.");
        return Ok(());
    }

    let marker = if dry_run { "[dry-run] would update" } else { "[updated]" };
    for path in &report.changed {
        println!("{} {}", marker.yellow(), path.display());
    }
    println!(
        "Processed {} files; changed {}.",
        report.processed,
        report.changed.len()
    );

    Ok(())
}
