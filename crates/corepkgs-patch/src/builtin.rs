//! In-process directory diff
//!
//! Produces the same text `diff -urN left right` would: one section per
//! differing file in recursive name order, absent files treated as empty,
//! three lines of context and tab-separated modification times.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use similar::TextDiff;
use walkdir::WalkDir;

use crate::{Error, Result};

/// Timestamp written for a side where the file does not exist.
const ABSENT_TIMESTAMP: &str = "1970-01-01 00:00:00.000000000 +0000";

const CONTEXT_RADIUS: usize = 3;

/// Output of comparing two directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryDiff {
    pub output: String,
    pub has_differences: bool,
}

/// Compare two directory trees recursively.
pub fn diff_directories(left: &Path, right: &Path) -> Result<DirectoryDiff> {
    let mut relative_paths = BTreeSet::new();
    collect_files(left, &mut relative_paths)?;
    collect_files(right, &mut relative_paths)?;

    let mut output = String::new();
    for segments in &relative_paths {
        let rel: PathBuf = segments.iter().collect();
        let left_file = left.join(&rel);
        let right_file = right.join(&rel);

        let left_bytes = read_or_empty(&left_file)?;
        let right_bytes = read_or_empty(&right_file)?;
        if left_bytes == right_bytes {
            continue;
        }

        output.push_str(&format!(
            "diff -urN {} {}\n",
            left_file.display(),
            right_file.display()
        ));

        match (text_of(&left_bytes), text_of(&right_bytes)) {
            (Some(old), Some(new)) => {
                let old_header = format!("{}\t{}", left_file.display(), timestamp_of(&left_file));
                let new_header =
                    format!("{}\t{}", right_file.display(), timestamp_of(&right_file));
                let diff = TextDiff::from_lines(old, new);
                output.push_str(
                    &diff
                        .unified_diff()
                        .context_radius(CONTEXT_RADIUS)
                        .header(&old_header, &new_header)
                        .to_string(),
                );
            }
            _ => {
                output.push_str(&format!(
                    "Binary files {} and {} differ\n",
                    left_file.display(),
                    right_file.display()
                ));
            }
        }
    }

    tracing::debug!(
        left = %left.display(),
        right = %right.display(),
        files = relative_paths.len(),
        "Compared directories in-process"
    );

    Ok(DirectoryDiff {
        has_differences: !output.is_empty(),
        output,
    })
}

/// Add every file below `root` as a list of path segments.
///
/// Segment lists sort the way `diff -r` visits entries: by name within each
/// directory, a directory's contents directly after its own name.
fn collect_files(root: &Path, into: &mut BTreeSet<Vec<String>>) -> Result<()> {
    if !root.is_dir() {
        return Ok(());
    }

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|source| Error::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        into.insert(
            rel.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect(),
        );
    }
    Ok(())
}

fn read_or_empty(path: &Path) -> Result<Vec<u8>> {
    if !path.is_file() {
        return Ok(Vec::new());
    }
    fs::read(path).map_err(|e| Error::io(path, e))
}

/// Text view of file content, or `None` when it looks binary.
fn text_of(bytes: &[u8]) -> Option<&str> {
    if bytes.contains(&0) {
        return None;
    }
    std::str::from_utf8(bytes).ok()
}

fn timestamp_of(path: &Path) -> String {
    if !path.is_file() {
        return ABSENT_TIMESTAMP.to_string();
    }
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map(format_timestamp)
        .unwrap_or_else(|_| ABSENT_TIMESTAMP.to_string())
}

fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S%.9f %z")
        .to_string()
}
