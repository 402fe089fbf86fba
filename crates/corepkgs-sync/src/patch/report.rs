//! The `index.txt` summary written next to the patches

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use corepkgs_fs::{NormalizedPath, io};

use crate::scan::DiffStats;
use crate::{Error, Result};

pub const INDEX_FILE: &str = "index.txt";

const PATCH_LIST_HEADER: &str = "# Patch files:";

/// Render the index text for a run.
///
/// `patch_names` are listed in sorted order; the not-found and new-file
/// lists are cut after `limit` entries.
pub fn render_index(
    stats: &DiffStats,
    patch_names: &[String],
    generated_at: &str,
    limit: usize,
) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "# Patches generated between corepkgs and nixpkgs\n\
         # Generated: {generated_at}\n\
         #\n\
         # Summary:\n\
         #   Total files processed: {}\n\
         #   Files found in nixpkgs: {}\n\
         #   Files with differences: {}\n\
         #   Files not found: {}\n\
         #   New files found: {}\n\
         #   Files ignored: {}\n\
         #\n\
         {PATCH_LIST_HEADER}\n",
        stats.processed,
        stats.found,
        stats.different,
        stats.not_found,
        stats.new_files,
        stats.ignored,
    );

    let mut names: Vec<&String> = patch_names.iter().collect();
    names.sort();
    for name in names {
        let _ = writeln!(out, "#   {name}");
    }

    if !stats.not_found_list.is_empty() {
        out.push_str("#\n# TODO: Files not found in nixpkgs (may need path mapping):\n");
        push_truncated(&mut out, &stats.not_found_list, limit);
    }
    if !stats.new_files_list.is_empty() {
        out.push_str("#\n# New files found in nixpkgs (will be added via patches):\n");
        push_truncated(&mut out, &stats.new_files_list, limit);
    }
    out
}

fn push_truncated(out: &mut String, items: &[String], limit: usize) {
    for item in items.iter().take(limit) {
        let _ = writeln!(out, "#   {item}");
    }
    if items.len() > limit {
        let _ = writeln!(out, "#   ... and {} more", items.len() - limit);
    }
}

/// Patch names listed in the `index.txt` of an earlier run.
///
/// Only plain `*.patch` file names are returned; anything else in the
/// listing is skipped. A missing index yields an empty list.
pub fn read_index_patches(patches_dir: &Path) -> Result<Vec<String>> {
    let path = patches_dir.join(INDEX_FILE);
    if !path.is_file() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;

    let names = text
        .lines()
        .skip_while(|line| *line != PATCH_LIST_HEADER)
        .skip(1)
        .map_while(|line| line.strip_prefix("#   "))
        .filter(|name| name.ends_with(".patch") && !name.contains(['/', '\\']))
        .map(str::to_string)
        .collect();
    Ok(names)
}

/// Write `index.txt` listing the patches written by this run.
pub fn write_index(
    patches_dir: &Path,
    stats: &DiffStats,
    patch_names: &[String],
    generated_at: &str,
    limit: usize,
) -> Result<PathBuf> {
    let content = render_index(stats, patch_names, generated_at, limit);
    let path = patches_dir.join(INDEX_FILE);
    io::write_text(&NormalizedPath::new(&path), &content)?;
    tracing::debug!(path = %path.display(), patches = patch_names.len(), "Wrote index");
    Ok(path)
}
