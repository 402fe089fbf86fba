//! Init-config command implementation

use std::path::Path;

use colored::Colorize;

use corepkgs_sync::SyncConfig;
use corepkgs_sync::config::defaults;

use super::resolve_root;
use crate::error::{CliError, Result};

/// Run the init-config command
///
/// Writes the built-in configuration so it can be edited. A relative
/// `output` is taken relative to the corepkgs checkout.
pub fn run_init_config(corepkgs: &Path, output: Option<&Path>, force: bool) -> Result<()> {
    let corepkgs = resolve_root(corepkgs, "corepkgs")?;
    let target = corepkgs.join(output.unwrap_or_else(|| Path::new(defaults::CONFIG_FILE)));

    if target.exists() && !force {
        return Err(CliError::user(format!(
            "{} already exists (use --force to overwrite)",
            target.display()
        )));
    }

    SyncConfig::default().save(&target)?;
    println!(
        "{} Wrote sync configuration to {}",
        "OK".green().bold(),
        target.display()
    );
    Ok(())
}
