//! Activation Service Library
//!
//! Binds activation codes to a single device and issues HMAC-signed access
//! tokens whose lifetime is capped by the code's expiry.
//!
//! - [`catalog`]: immutable code to expiry table
//! - [`binding`]: per-code binding store with atomic bind-if-absent
//! - [`token`]: token issuance and verification
//! - [`service`]: claim and admin unbind
//! - [`http`]: axum adapter

pub mod binding;
pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod service;
pub mod shutdown;
pub mod token;

pub use config::Config;
pub use error::{ActivationError, ErrorCode};
pub use service::{ActivationService, ClaimGrant, ClaimOutcome, ClaimRequest};
