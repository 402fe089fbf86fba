//! Unified diff handling for corepkgs patch generation
//!
//! Parses `diff -urN` output into file sections and hunks, rewrites the
//! absolute paths in its headers into stable `a/`/`b/` labels, drops hunks
//! that only touch maintainer metadata, and can produce the same output
//! format in-process from two directories.

pub mod builtin;
pub mod error;
pub mod filter;
pub mod headers;
pub mod unified;

pub use builtin::{DirectoryDiff, diff_directories};
pub use error::{Error, Result};
pub use filter::{FilterOutcome, MetadataFilter};
pub use headers::{HeaderLabels, extract_relative_path, relabel_headers, replace_diff_path};
pub use unified::{FileSection, Hunk, HunkHeader, PatchDocument, SectionPart};
