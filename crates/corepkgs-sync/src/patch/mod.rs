//! Patch files and their index
//!
//! - **runner**: produce `diff -urN` output with the system tool or in-process
//! - **generator**: one filtered, relabelled patch per directory
//! - **report**: the `index.txt` summary

mod generator;
mod report;
mod runner;

pub use generator::{GeneratedPatch, PatchGenerator, patch_file_name};
pub use report::{INDEX_FILE, read_index_patches, render_index, write_index};
pub use runner::{BuiltinDiff, DiffOutput, DiffRunner, SystemDiff};
