//! Token payload.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Token payload.
///
/// Field order is the serialization order and is part of the wire format:
/// `{"code","host","ua","exp","dev"}`, `exp` in epoch milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Activation code
    pub code: String,
    /// Client host, possibly empty
    pub host: String,
    /// Client user agent, possibly empty
    pub ua: String,
    /// Expiry, epoch milliseconds
    pub exp: i64,
    /// Bound device identifier
    pub dev: String,
}

impl TokenClaims {
    /// Claims for `device_id` on `code`, valid until `expires_at`.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        device_id: impl Into<String>,
        host: impl Into<String>,
        user_agent: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        TokenClaims {
            code: code.into(),
            host: host.into(),
            ua: user_agent.into(),
            exp: expires_at.timestamp_millis(),
            dev: device_id.into(),
        }
    }

    /// `exp` as an instant, if representable.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.exp).single()
    }

    /// Expired strictly after `exp`; the boundary millisecond is still valid.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp < now.timestamp_millis()
    }
}
