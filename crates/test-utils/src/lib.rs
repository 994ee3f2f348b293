//! Shared test utilities for the relief-colorizer workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic elevation grid and raster generators
//! - An in-memory `RasterReader`
//! - PNG fixture writers for tests that go through the filesystem
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
