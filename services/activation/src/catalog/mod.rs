//! Activation code catalog.
//!
//! Built once at startup and shared read-only. Lookup never fails: an unknown
//! code is simply absent.

pub mod expiry;

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::ActivationError;

pub use expiry::{parse_expiry, parse_expiry_in};

/// Sample codes served when no catalog is configured.
pub const DEVELOPMENT_CODES: [(&str, &str); 3] = [
    ("ACT-2025-1234-ABCD", "2025-12-31 23:59"),
    ("ACT-2025-5678-EFGH", "2025-12-31 16:00"),
    ("ACT-2025-5214-HADI", "2025-10-18 16:02"),
];

/// Immutable mapping from activation code to expiry instant.
#[derive(Debug, Clone, Default)]
pub struct CodeCatalog {
    entries: HashMap<String, DateTime<Utc>>,
}

impl CodeCatalog {
    /// Build a catalog from `(code, expiry string)` pairs.
    ///
    /// # Errors
    ///
    /// Fails on the first expiry string that does not parse.
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self, ActivationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|(code, raw)| {
                let code = code.into();
                parse_expiry(raw.as_ref())
                    .map(|expires_at| (code, expires_at))
                    .map_err(|e| ActivationError::config(format!("catalog entry: {e}")))
            })
            .collect::<Result<HashMap<_, _>, _>>()?;

        Ok(Self { entries })
    }

    /// Parse a JSON object of `code -> expiry string`.
    ///
    /// # Errors
    ///
    /// Fails if the document is not an object of strings or any expiry is
    /// unparseable.
    pub fn from_json(raw: &str) -> Result<Self, ActivationError> {
        let map: HashMap<String, String> = serde_json::from_str(raw)
            .map_err(|e| ActivationError::config(format!("ACTIVATION_CODES is not a code->expiry object: {e}")))?;
        Self::from_entries(map)
    }

    /// Catalog with the built-in sample codes. Not for production use.
    ///
    /// # Errors
    ///
    /// Only if the local zone cannot represent one of the sample expiries.
    pub fn development() -> Result<Self, ActivationError> {
        Self::from_entries(DEVELOPMENT_CODES)
    }

    /// Build a catalog from already-resolved instants.
    #[must_use]
    pub fn from_instants<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, DateTime<Utc>)>,
        K: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Expiry instant of `code`, if it is in the catalog.
    #[must_use]
    pub fn lookup(&self, code: &str) -> Option<DateTime<Utc>> {
        self.entries.get(code).copied()
    }

    /// Number of codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog holds no codes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
