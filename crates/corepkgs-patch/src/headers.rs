//! Rewriting of diff header paths
//!
//! `diff -urN` prints the absolute paths it was given. Patches are applied
//! with `patch -p1` from the corepkgs root, so every header is rewritten to
//! `a/<dir>/<file>` and `b/<dir>/<file>`.

use crate::unified::{PatchDocument, SectionPart};

/// Labels used when rewriting one directory diff.
#[derive(Debug, Clone)]
pub struct HeaderLabels {
    /// Directory relative to the corepkgs root (`.` for the root itself).
    pub dir: String,
    /// Absolute local directory as passed to diff, with a trailing `/`.
    pub local_base: String,
    /// Absolute upstream directory as passed to diff, with a trailing `/`.
    pub upstream_base: String,
}

impl HeaderLabels {
    pub fn new(dir: impl Into<String>, local_base: &str, upstream_base: &str) -> Self {
        Self {
            dir: dir.into(),
            local_base: with_trailing_slash(local_base),
            upstream_base: with_trailing_slash(upstream_base),
        }
    }
}

fn with_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}

/// Path of `absolute` below `base`, or just its file name when it is elsewhere.
pub fn extract_relative_path(absolute: &str, base: &str) -> String {
    match absolute.strip_prefix(base) {
        Some(rest) => rest.trim_start_matches('/').to_string(),
        None => absolute
            .rsplit('/')
            .next()
            .unwrap_or(absolute)
            .to_string(),
    }
}

/// Rewrite one `---`/`+++` header line.
///
/// `prefix` is the marker plus side label (`--- a` or `+++ b`). A
/// tab-separated timestamp after the path is kept verbatim.
pub fn replace_diff_path(line: &str, prefix: &str, base: &str, dir: &str) -> String {
    let Some((_, rest)) = line.split_once(' ') else {
        return line.to_string();
    };

    let (absolute, timestamp) = match rest.split_once('\t') {
        Some((path, stamp)) => (path, Some(stamp)),
        None => (rest.trim(), None),
    };

    let relative = extract_relative_path(absolute, base);
    let full_path = if dir == corepkgs_root_marker() {
        relative
    } else {
        format!("{dir}/{relative}")
    };

    match timestamp {
        Some(stamp) => format!("{prefix}/{full_path}\t{stamp}"),
        None => format!("{prefix}/{full_path}\n"),
    }
}

fn corepkgs_root_marker() -> &'static str {
    "."
}

/// Rewrite every header line of a directory diff.
///
/// Only lines outside hunk bodies are touched, so changed content that
/// happens to start with `---` or `+++` is left alone.
pub fn relabel_headers(diff: &str, labels: &HeaderLabels) -> String {
    let mut doc = PatchDocument::parse(diff);
    let dir = labels.dir.as_str();

    let relabel = |line: &mut String| {
        if line.starts_with("diff -urN") {
            *line = format!("diff -urN a/{dir} b/{dir}\n");
        } else if line.starts_with("---") {
            *line = replace_diff_path(line, "--- a", &labels.local_base, dir);
        } else if line.starts_with("+++") {
            *line = replace_diff_path(line, "+++ b", &labels.upstream_base, dir);
        }
    };

    doc.preamble.iter_mut().for_each(relabel);
    for section in &mut doc.sections {
        for part in &mut section.parts {
            if let SectionPart::Line(line) = part {
                relabel(line);
            }
        }
    }

    doc.render()
}
