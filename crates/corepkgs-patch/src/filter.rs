//! Metadata-only hunk filtering
//!
//! Local packages deliberately carry empty `maintainers` lists, so upstream
//! maintainer churn shows up in almost every directory diff. Such hunks are
//! removed whole; a hunk is never edited, which keeps its line counts valid.

use crate::unified::{FileSection, Hunk, PatchDocument, SectionPart};

/// Residual characters above which a hunk counts as a real change.
pub const RESIDUAL_THRESHOLD: usize = 20;

/// Decides which hunks only touch a metadata field.
#[derive(Debug, Clone)]
pub struct MetadataFilter {
    /// Field name that must appear among the changed lines.
    field: String,
    /// Tokens stripped before measuring what is left.
    tokens: Vec<String>,
    threshold: usize,
}

impl Default for MetadataFilter {
    fn default() -> Self {
        Self::maintainers()
    }
}

/// Result of filtering a diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    /// The diff with metadata-only hunks removed, newline terminated.
    pub content: String,
    /// Whether at least one hunk survived.
    pub has_changes: bool,
    /// Number of hunks removed.
    pub dropped_hunks: usize,
}

impl MetadataFilter {
    /// Filter for `maintainers = [ ... ];` and `maintainers = with maintainers; [ ... ];`.
    pub fn maintainers() -> Self {
        Self {
            field: "maintainers".to_string(),
            tokens: ["maintainers", "with", "[", "]", "=", ";"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            threshold: RESIDUAL_THRESHOLD,
        }
    }

    /// Whether every change in `hunk` is attributable to the metadata field.
    ///
    /// A hunk without changed lines is never metadata-only.
    pub fn is_metadata_only(&self, hunk: &Hunk) -> bool {
        let changes: Vec<String> = hunk
            .changed_lines()
            .map(|l| l.trim().to_lowercase())
            .collect();
        if changes.is_empty() {
            return false;
        }

        let joined = changes.join(" ");
        if !joined.contains(&self.field) {
            return false;
        }

        let mut residual = joined;
        for token in &self.tokens {
            residual = residual.replace(token.as_str(), "");
        }
        let residual: String = residual
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect();

        residual.trim().chars().count() <= self.threshold
    }

    /// Remove metadata-only hunks from a diff.
    ///
    /// File sections that lose all of their hunks are removed with them, so
    /// no header is left without a body. Sections that never had hunks
    /// (binary notices) are kept as they are.
    pub fn apply(&self, diff: &str) -> FilterOutcome {
        if diff.is_empty() {
            return FilterOutcome {
                content: String::new(),
                has_changes: false,
                dropped_hunks: 0,
            };
        }

        let doc = PatchDocument::parse(diff);
        let mut dropped_hunks = 0;
        let mut sections = Vec::with_capacity(doc.sections.len());

        for section in doc.sections {
            let had_hunks = section.has_hunks();
            let parts: Vec<SectionPart> = section
                .parts
                .into_iter()
                .filter(|part| match part {
                    SectionPart::Hunk(hunk) if self.is_metadata_only(hunk) => {
                        dropped_hunks += 1;
                        false
                    }
                    _ => true,
                })
                .collect();
            let kept = FileSection { parts };
            if had_hunks && !kept.has_hunks() {
                continue;
            }
            sections.push(kept);
        }

        let filtered = PatchDocument {
            preamble: doc.preamble,
            sections,
        };
        let has_changes = filtered.hunk_count() > 0;
        let mut content = filtered.render();
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }

        tracing::debug!(dropped_hunks, has_changes, "Filtered metadata hunks");

        FilterOutcome {
            content,
            has_changes,
            dropped_hunks,
        }
    }
}
