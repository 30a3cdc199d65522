//! In-process binding store for development and tests.
//!
//! Entries carry their own deletion deadline, evaluated lazily on every access,
//! which mirrors store-native TTL from the caller's point of view.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_common::PlatformError;
use tokio::sync::RwLock;

use super::model::{Binding, binding_key};
use super::store::{BindOutcome, BindingStore};

struct Entry {
    binding: Binding,
    delete_at: Option<DateTime<Utc>>,
}

impl Entry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.delete_at.is_none_or(|at| now < at)
    }
}

/// Binding store backed by a lock-protected map.
#[derive(Default)]
pub struct MemoryBindingStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryBindingStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live bindings.
    pub async fn len(&self) -> usize {
        let now = Utc::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }

    /// Whether no live binding exists.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl BindingStore for MemoryBindingStore {
    async fn get(&self, code: &str) -> Result<Option<Binding>, PlatformError> {
        let key = binding_key(code);
        let now = Utc::now();
        let entries = self.entries.read().await;

        Ok(entries
            .get(&key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.binding.clone()))
    }

    async fn set(&self, code: &str, binding: &Binding) -> Result<(), PlatformError> {
        let entry = Entry {
            binding: binding.clone(),
            delete_at: None,
        };
        self.entries.write().await.insert(binding_key(code), entry);
        Ok(())
    }

    async fn expire_at(&self, code: &str, at: DateTime<Utc>) -> Result<(), PlatformError> {
        let key = binding_key(code);
        let now = Utc::now();
        let mut entries = self.entries.write().await;

        match entries.get_mut(&key) {
            Some(entry) if entry.is_live(now) => {
                entry.delete_at = Some(at);
                return Ok(());
            }
            _ => {}
        }
        // Absent or already past its deadline.
        entries.remove(&key);
        Ok(())
    }

    async fn delete(&self, code: &str) -> Result<bool, PlatformError> {
        let now = Utc::now();
        let removed = self.entries.write().await.remove(&binding_key(code));
        Ok(removed.is_some_and(|entry| entry.is_live(now)))
    }

    async fn bind_if_absent(&self, code: &str, binding: &Binding) -> Result<BindOutcome, PlatformError> {
        let key = binding_key(code);
        let now = Utc::now();
        let mut entries = self.entries.write().await;

        if let Some(existing) = entries.get(&key).filter(|entry| entry.is_live(now)) {
            return Ok(BindOutcome::Existing(existing.binding.clone()));
        }

        entries.insert(
            key,
            Entry {
                binding: binding.clone(),
                delete_at: Some(binding.expires_at),
            },
        );
        Ok(BindOutcome::Bound)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
