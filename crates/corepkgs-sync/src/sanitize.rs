//! Maintainer field sanitizing for Nix files
//!
//! Every `maintainers = ...;` list assignment is replaced by an empty list
//! and every `teams = [ ... ];` assignment is removed.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use corepkgs_fs::{NormalizedPath, io};
use regex::Regex;
use walkdir::WalkDir;

use crate::{Error, Result};

/// `teams = [ ... ];` including an optional `with <scope>;` and the rest of
/// its line. The indentation of the following line is left alone.
static TEAMS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^[ \t]*teams\s*=\s*(?:with\s+[^\s;]+?\s*;\s*)?\[.*?\]\s*;[ \t]*\n?").unwrap()
});

/// `maintainers = [ ... ];` or `maintainers = with <scope>; [ ... ];`.
static MAINTAINERS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)(?P<indent>^[ \t]*)maintainers\s*=\s*(?:with\s+[^\s;]+?\s*;\s*)?\[.*?\]\s*;")
        .unwrap()
});

/// Outcome of a sanitize run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizeReport {
    /// Files examined.
    pub processed: usize,
    /// Files whose content changed (or would change in a dry run).
    pub changed: Vec<PathBuf>,
}

/// Rewrite the maintainer fields of one file's content.
pub fn sanitize_text(content: &str) -> String {
    let without_teams = TEAMS_PATTERN.replace_all(content, "");
    MAINTAINERS_PATTERN
        .replace_all(&without_teams, "${indent}maintainers = [ ];")
        .into_owned()
}

/// `.nix` files named by `paths`, directories searched recursively.
///
/// Each directory contributes its files in sorted order; a file reached
/// through several arguments is listed once.
pub fn collect_nix_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut seen = BTreeSet::new();
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut found = Vec::new();
            for entry in WalkDir::new(path) {
                let entry = entry.map_err(|source| Error::Walk {
                    root: path.clone(),
                    source,
                })?;
                if entry.file_type().is_file() && is_nix_file(entry.path()) {
                    found.push(entry.into_path());
                }
            }
            found.sort();
            for file in found {
                if seen.insert(file.clone()) {
                    files.push(file);
                }
            }
        } else if path.is_file() && is_nix_file(path) && seen.insert(path.clone()) {
            files.push(path.clone());
        }
    }

    Ok(files)
}

fn is_nix_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "nix")
}

/// Sanitize every `.nix` file below `paths`.
///
/// With `dry_run` nothing is written; the report still lists the files that
/// would change.
pub fn sanitize_paths(paths: &[PathBuf], dry_run: bool) -> Result<SanitizeReport> {
    let files = collect_nix_files(paths)?;
    let mut report = SanitizeReport {
        processed: files.len(),
        changed: Vec::new(),
    };

    for file in files {
        let original = fs::read_to_string(&file).map_err(|e| Error::io(&file, e))?;
        let updated = sanitize_text(&original);
        if updated == original {
            tracing::debug!(path = %file.display(), "Unchanged");
            continue;
        }

        if dry_run {
            tracing::info!(path = %file.display(), "Would update");
        } else {
            io::write_text(&NormalizedPath::new(&file), &updated)?;
            tracing::info!(path = %file.display(), "Updated");
        }
        report.changed.push(file);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case::single_line(
        "  meta = {\n    maintainers = with lib.maintainers; [ foo bar ];\n  };\n",
        "  meta = {\n    maintainers = [ ];\n  };\n"
    )]
    #[case::plain_list(
        "    maintainers = [ lib.maintainers.foo ];\n",
        "    maintainers = [ ];\n"
    )]
    #[case::multi_line(
        "    maintainers = with maintainers; [\n      foo\n      bar\n    ];\n    platforms = p;\n",
        "    maintainers = [ ];\n    platforms = p;\n"
    )]
    #[case::teams_removed(
        "    teams = [ lib.teams.llvm ];\n    maintainers = [ ];\n",
        "    maintainers = [ ];\n"
    )]
    #[case::teams_with_scope(
        "    teams = with lib.teams; [\n      llvm\n    ];\n    license = l;\n",
        "    license = l;\n"
    )]
    #[case::already_clean("    maintainers = [ ];\n", "    maintainers = [ ];\n")]
    fn test_sanitize_text(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_text(input), expected);
    }

    #[test]
    fn test_collect_dedups_and_filters() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("pkgs/b")).unwrap();
        fs::write(root.join("pkgs/b/default.nix"), "x").unwrap();
        fs::write(root.join("pkgs/a.nix"), "x").unwrap();
        fs::write(root.join("pkgs/readme.md"), "x").unwrap();

        let files = collect_nix_files(&[root.join("pkgs"), root.join("pkgs/a.nix")]).unwrap();
        assert_eq!(files, vec![root.join("pkgs/a.nix"), root.join("pkgs/b/default.nix")]);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("default.nix");
        let content = "  maintainers = with maintainers; [ foo ];\n";
        fs::write(&file, content).unwrap();

        let report = sanitize_paths(&[dir.path().to_path_buf()], true).unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.changed, vec![file.clone()]);
        assert_eq!(fs::read_to_string(&file).unwrap(), content);
    }

    #[test]
    fn test_writes_sanitized_content() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("default.nix");
        fs::write(&file, "  maintainers = with maintainers; [ foo ];\n").unwrap();
        fs::write(dir.path().join("clean.nix"), "{ }\n").unwrap();

        let report = sanitize_paths(&[dir.path().to_path_buf()], false).unwrap();
        assert_eq!(report.processed, 2);
        assert_eq!(report.changed.len(), 1);
        assert_eq!(fs::read_to_string(&file).unwrap(), "  maintainers = [ ];\n");
    }
}
