//! Shared test utilities for the corepkgs workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`tree`]: [`TreeFixture`] with a corepkgs and a nixpkgs tree side by side

pub mod tree;

pub use tree::TreeFixture;
