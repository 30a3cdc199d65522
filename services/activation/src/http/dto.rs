//! Request and response bodies.

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::ActivationError;
use crate::service::{ClaimGrant, scalar_string};

/// Local wall-clock rendering used for `expiresText`.
pub const EXPIRES_TEXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Body of `POST /api/verify`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    /// Whether a token was granted
    pub ok: bool,
    /// Rejection reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Signed token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Code expiry, epoch milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    /// Code expiry in server local time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_text: Option<String>,
}

impl ClaimResponse {
    /// Success body for `grant`.
    #[must_use]
    pub fn granted(grant: &ClaimGrant) -> Self {
        Self {
            ok: true,
            message: None,
            token: Some(grant.token.clone()),
            expires_at: Some(grant.expires_at.timestamp_millis()),
            expires_text: Some(
                grant
                    .expires_at
                    .with_timezone(&Local)
                    .format(EXPIRES_TEXT_FORMAT)
                    .to_string(),
            ),
        }
    }

    /// Failure body carrying the public message of `err`.
    #[must_use]
    pub fn rejected(err: &ActivationError) -> Self {
        Self {
            ok: false,
            message: Some(err.public_message()),
            ..Self::default()
        }
    }
}

/// Body of `POST /api/unbind`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnbindRequest {
    /// Code to release
    #[serde(deserialize_with = "scalar_string")]
    pub code: Option<String>,
    /// Shared admin secret
    #[serde(deserialize_with = "scalar_string")]
    pub admin_secret: Option<String>,
}

/// `{ok, message}` reply shared by unbind and method errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    /// Outcome
    pub ok: bool,
    /// Human-readable result
    pub message: String,
}

impl MessageResponse {
    /// `ok: true` body.
    pub fn success(message: impl Into<String>) -> Self {
        Self { ok: true, message: message.into() }
    }

    /// `ok: false` body.
    pub fn failure(message: impl Into<String>) -> Self {
        Self { ok: false, message: message.into() }
    }
}
