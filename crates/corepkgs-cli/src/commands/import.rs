//! Import command implementation

use std::path::Path;

use colored::Colorize;

use corepkgs_sync::{ImportKind, PackageImporter};

use super::{resolve_nixpkgs, resolve_root};
use crate::error::Result;

/// Run the import command
///
/// Packages are imported in the order given; the first failure stops the
/// run.
pub fn run_import(
    names: &[String],
    python: bool,
    nixpkgs_root: Option<&Path>,
    corepkgs: &Path,
    force: bool,
) -> Result<()> {
    let corepkgs = resolve_root(corepkgs, "corepkgs")?;
    let nixpkgs = resolve_nixpkgs(nixpkgs_root, &corepkgs)?;
    let kind = if python {
        ImportKind::Python
    } else {
        ImportKind::ByName
    };

    let importer = PackageImporter::new(nixpkgs, corepkgs).force(force);
    for name in names {
        let outcome = importer.import(name, kind)?;
        println!(
            "{} Imported {} -> {}",
            "OK".green().bold(),
            outcome.source.display(),
            outcome.destination.display()
        );
        if outcome.renamed {
            println!("   {} package.nix -> default.nix", "~".cyan());
        }
    }

    Ok(())
}
