//! Synchronization between corepkgs and nixpkgs
//!
//! This crate compares a corepkgs checkout with the nixpkgs checkout it was
//! carved from and produces reviewable, per-directory patches:
//!
//! - **Configuration**: path mapping table, ignore rules and discovery roots ([`SyncConfig`])
//! - **Path mapping**: corepkgs-relative paths to nixpkgs locations and back ([`PathMapper`])
//! - **Classification**: which paths never take part in a comparison ([`IgnoreClassifier`])
//! - **Scanning**: local walk plus discovery of upstream-only files ([`scan`])
//! - **Patches**: filtered `diff -urN` output per directory and an index ([`patch`])
//! - **SyncEngine**: one complete run over both trees
//! - **Import / sanitize**: bringing single packages over and clearing maintainer lists
//!
//! # Architecture
//!
//! ```text
//!                 corepkgs CLI
//!                      |
//!                corepkgs-sync
//!                      |
//!            +---------+---------+
//!            |                   |
//!       corepkgs-fs       corepkgs-patch
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use corepkgs_sync::{SyncConfig, SyncEngine, SyncOptions};
//!
//! fn example() -> corepkgs_sync::Result<()> {
//!     let engine = SyncEngine::new(
//!         SyncConfig::default(),
//!         Path::new("corepkgs"),
//!         Path::new("nixpkgs"),
//!     )?;
//!     let report = engine.run(&SyncOptions::default())?;
//!     println!("{} patches", report.patches.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod ignore;
pub mod import;
pub mod mapper;
pub mod patch;
pub mod sanitize;
pub mod scan;

pub use config::{
    DiscoveryConfig, FlattenedLayout, IgnoreRules, MappingRule, MappingTable, SyncConfig,
};
pub use engine::{DiffBackend, SyncEngine, SyncOptions, SyncReport, TIMESTAMP_FORMAT};
pub use error::{Error, Result};
pub use ignore::IgnoreClassifier;
pub use import::{ImportKind, ImportOutcome, PackageImporter};
pub use mapper::PathMapper;
pub use patch::{
    BuiltinDiff, DiffOutput, DiffRunner, GeneratedPatch, PatchGenerator, SystemDiff,
};
pub use sanitize::{SanitizeReport, collect_nix_files, sanitize_paths, sanitize_text};
pub use scan::{DiffEntry, DiffStats};
