//! Infrastructure error type shared by store adapters.
//!
//! Store adapters translate their client library errors into
//! [`PlatformError`] so that callers see one taxonomy regardless of the
//! backend. Every variant is classified as retryable or not; the decision to
//! retry belongs to the caller.

use thiserror::Error;

/// Common error type for infrastructure operations.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Backing service could not be reached
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Operation did not complete in time
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Stored or transmitted payload could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backing service answered with something the adapter cannot interpret
    #[error("Unexpected response from {service}: {reason}")]
    UnexpectedResponse {
        /// The service that produced the response
        service: String,
        /// What was wrong with it
        reason: String,
    },

    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlatformError {
    /// Check if this error is retryable.
    ///
    /// Only transient transport failures qualify.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_common::PlatformError;
    ///
    /// let err = PlatformError::unavailable("connection refused");
    /// assert!(err.is_retryable());
    ///
    /// let err = PlatformError::invalid_input("empty key");
    /// assert!(!err.is_retryable());
    /// ```
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }

    /// Create an unavailable error with the given message.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a timeout error with the given message.
    #[must_use]
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create an unexpected response error.
    #[must_use]
    pub fn unexpected_response(service: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            service: service.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid input error with the given message.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an internal error with the given message.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
