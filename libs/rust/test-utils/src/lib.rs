//! Shared test utilities for activation platform Rust crates.
//!
//! This crate provides:
//! - Proptest generators for codes, devices and catalog expiry strings
//! - Test fixtures with sample catalogs

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

pub use generators::*;
