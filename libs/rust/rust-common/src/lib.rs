//! Shared library for cross-cutting concerns in activation platform Rust services.
//!
//! This crate provides centralized implementations for:
//! - Infrastructure error types with retryability classification
//! - Tracing subscriber initialisation (JSON or pretty output)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod tracing_config;

pub use error::PlatformError;
pub use tracing_config::{LogFormat, TracingConfig, init_tracing};
