//! Error taxonomy for the activation service.
//!
//! Every failure a caller can observe maps to an [`ErrorCode`] and a short
//! public message. Infrastructure and internal failures share the generic
//! `Server error` message so no detail leaks to clients.

use rust_common::PlatformError;
use thiserror::Error;

/// Errors produced by claim, unbind and token verification.
#[derive(Error, Debug)]
pub enum ActivationError {
    /// A required request field is absent or empty.
    #[error("Missing {0}")]
    MissingField(&'static str),

    /// The code is not in the catalog.
    #[error("Invalid code")]
    InvalidCode,

    /// The code's catalog expiry has passed.
    #[error("Code expired")]
    CodeExpired,

    /// Another device holds the binding for this code.
    #[error("Code already bound to another device")]
    AlreadyBound,

    /// Admin secret missing or wrong.
    #[error("Forbidden")]
    Forbidden,

    /// Token could not be split or decoded.
    #[error("Token malformed: {0}")]
    TokenMalformed(String),

    /// Token tag does not match its payload.
    #[error("Token signature invalid")]
    TokenForged,

    /// Token `exp` is in the past.
    #[error("Token expired")]
    TokenExpired,

    /// Binding store failure.
    #[error("Store error: {0}")]
    Store(#[from] PlatformError),

    /// Startup configuration problem.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Anything else.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Stable machine-readable codes, used in logs and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Client omitted a required field
    MissingField,
    /// Unknown activation code
    InvalidCode,
    /// Activation code past its expiry
    CodeExpired,
    /// Code bound to a different device
    AlreadyBound,
    /// Admin secret rejected
    Forbidden,
    /// Undecodable token
    TokenMalformed,
    /// Tampered token
    TokenForged,
    /// Token past its `exp`
    TokenExpired,
    /// Store unreachable or misbehaving
    StoreUnavailable,
    /// Misconfiguration
    Config,
    /// Unclassified failure
    Internal,
}

impl ErrorCode {
    /// String form of the code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MissingField => "MISSING_FIELD",
            Self::InvalidCode => "INVALID_CODE",
            Self::CodeExpired => "CODE_EXPIRED",
            Self::AlreadyBound => "ALREADY_BOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::TokenMalformed => "TOKEN_MALFORMED",
            Self::TokenForged => "TOKEN_FORGED",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::Config => "CONFIG_ERROR",
            Self::Internal => "INTERNAL_ERROR",
        }
    }
}

impl ActivationError {
    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create a malformed token error.
    #[must_use]
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::TokenMalformed(msg.into())
    }

    /// Get the error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MissingField(_) => ErrorCode::MissingField,
            Self::InvalidCode => ErrorCode::InvalidCode,
            Self::CodeExpired => ErrorCode::CodeExpired,
            Self::AlreadyBound => ErrorCode::AlreadyBound,
            Self::Forbidden => ErrorCode::Forbidden,
            Self::TokenMalformed(_) => ErrorCode::TokenMalformed,
            Self::TokenForged => ErrorCode::TokenForged,
            Self::TokenExpired => ErrorCode::TokenExpired,
            Self::Store(_) => ErrorCode::StoreUnavailable,
            Self::Config(_) => ErrorCode::Config,
            Self::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Whether the failure is a server-side fault rather than a rejection.
    #[must_use]
    pub const fn is_server_fault(&self) -> bool {
        matches!(self, Self::Store(_) | Self::Config(_) | Self::Internal(_))
    }

    /// Message safe to hand back to a client.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::TokenMalformed(_) => "Token malformed".to_string(),
            err if err.is_server_fault() => "Server error".to_string(),
            err => err.to_string(),
        }
    }
}
