//! Stored binding record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Exclusive claim of one device on one activation code.
///
/// Serialized as `{"deviceId", "boundAt", "expiresAt"}` with epoch-millisecond
/// instants, the layout already present in deployed stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    /// Client-supplied device identifier
    pub device_id: String,
    /// When the binding was written
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub bound_at: DateTime<Utc>,
    /// Copied from the code's catalog expiry
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
}

impl Binding {
    /// Create a binding record.
    #[must_use]
    pub fn new(device_id: impl Into<String>, bound_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Binding {
            device_id: device_id.into(),
            bound_at,
            expires_at,
        }
    }

    /// Whether `device_id` owns this binding.
    #[must_use]
    pub fn is_held_by(&self, device_id: &str) -> bool {
        self.device_id == device_id
    }
}

/// Store key for a code's binding.
#[must_use]
pub fn binding_key(code: &str) -> String {
    format!("bind:{}", code)
}
