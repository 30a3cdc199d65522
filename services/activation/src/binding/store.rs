//! Binding store abstraction.
//!
//! Implementations front an external key-value service. The only
//! synchronization primitive for same-code claims is
//! [`BindingStore::bind_if_absent`]; it must be a single atomic operation in
//! the backing store, since several service instances may share it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_common::PlatformError;

use super::model::Binding;

/// Result of an atomic bind attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindOutcome {
    /// No binding existed; the supplied one was written with its TTL.
    Bound,
    /// A live binding already existed and was left untouched.
    Existing(Binding),
}

/// Key-value operations on per-code bindings, keyed `bind:<code>`.
#[async_trait]
pub trait BindingStore: Send + Sync {
    /// Read the live binding for `code`.
    async fn get(&self, code: &str) -> Result<Option<Binding>, PlatformError>;

    /// Overwrite the binding for `code` unconditionally, without a TTL.
    async fn set(&self, code: &str, binding: &Binding) -> Result<(), PlatformError>;

    /// Have the store delete the binding at or after `at`.
    async fn expire_at(&self, code: &str, at: DateTime<Utc>) -> Result<(), PlatformError>;

    /// Remove the binding. Returns whether one existed.
    async fn delete(&self, code: &str) -> Result<bool, PlatformError>;

    /// Write `binding` with TTL `binding.expires_at` only if no live binding
    /// exists, otherwise return the existing one. Check and write are atomic.
    async fn bind_if_absent(&self, code: &str, binding: &Binding) -> Result<BindOutcome, PlatformError>;

    /// Backend name for logs and metrics.
    fn backend(&self) -> &'static str;
}
