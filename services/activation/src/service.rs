//! Claim and unbind orchestration.
//!
//! A claim passes the catalog gate, the expiry gate and the atomic bind before
//! a token is stamped. Expiry is checked before any store access.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use rust_common::PlatformError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use subtle::ConstantTimeEq;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::binding::{BindOutcome, Binding, BindingStore};
use crate::catalog::CodeCatalog;
use crate::config::Config;
use crate::error::ActivationError;
use crate::metrics;
use crate::token::{HmacSha256Signer, TokenClaims, TokenIssuer, TokenSigner, TokenVerifier};

/// Claim input. Absent fields deserialize as `None`; numbers and booleans are
/// taken in their JSON text form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClaimRequest {
    /// Activation code
    #[serde(deserialize_with = "scalar_string")]
    pub code: Option<String>,
    /// Client device identifier
    #[serde(deserialize_with = "scalar_string")]
    pub device_id: Option<String>,
    /// Client host, empty when absent
    #[serde(deserialize_with = "scalar_string")]
    pub host: Option<String>,
    /// Client user agent, empty when absent
    #[serde(deserialize_with = "scalar_string")]
    pub ua: Option<String>,
}

/// Read a JSON scalar as text. `null`, arrays and objects read as absent.
pub(crate) fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        serde_json::Value::Null | serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
    })
}

impl ClaimRequest {
    /// Request with the two required fields set.
    pub fn new(code: impl Into<String>, device_id: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            device_id: Some(device_id.into()),
            ..Self::default()
        }
    }

    /// Set the client host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the client user agent.
    #[must_use]
    pub fn with_ua(mut self, ua: impl Into<String>) -> Self {
        self.ua = Some(ua.into());
        self
    }
}

/// How a successful claim related to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// A new binding was written.
    Bound,
    /// The device already held the binding.
    Reconfirmed,
}

impl ClaimOutcome {
    /// Label used in metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bound => "BOUND",
            Self::Reconfirmed => "RECONFIRMED",
        }
    }
}

/// Result of a successful claim.
#[derive(Debug, Clone)]
pub struct ClaimGrant {
    /// Signed token
    pub token: String,
    /// Claims inside `token`
    pub claims: TokenClaims,
    /// Catalog expiry of the code
    pub expires_at: DateTime<Utc>,
    /// New binding or re-confirmation
    pub outcome: ClaimOutcome,
}

/// The binding and token issuance core.
pub struct ActivationService {
    catalog: Arc<CodeCatalog>,
    store: Arc<dyn BindingStore>,
    signer: Arc<dyn TokenSigner>,
    issuer: TokenIssuer,
    admin_secret: SecretString,
}

impl ActivationService {
    /// Assemble the service from its collaborators.
    pub fn new(
        catalog: Arc<CodeCatalog>,
        store: Arc<dyn BindingStore>,
        signer: Arc<dyn TokenSigner>,
        admin_secret: SecretString,
    ) -> Self {
        Self {
            catalog,
            store,
            issuer: TokenIssuer::new(signer.clone()),
            signer,
            admin_secret,
        }
    }

    /// Wire the service from loaded configuration and a connected store.
    pub fn from_config(config: &Config, store: Arc<dyn BindingStore>) -> Self {
        let signer = Arc::new(HmacSha256Signer::new(config.sign_secret.expose_secret().as_bytes()));
        Self::new(
            Arc::new(config.catalog.clone()),
            store,
            signer,
            config.admin_secret.clone(),
        )
    }

    /// Verifier keyed with this service's signing secret.
    pub fn verifier(&self) -> TokenVerifier {
        TokenVerifier::new(self.signer.clone())
    }

    /// Underlying binding store.
    pub fn store(&self) -> &Arc<dyn BindingStore> {
        &self.store
    }

    /// Loaded code catalog.
    pub fn catalog(&self) -> &CodeCatalog {
        &self.catalog
    }

    /// Claim against the current server time.
    pub async fn claim(&self, request: &ClaimRequest) -> Result<ClaimGrant, ActivationError> {
        self.claim_at(request, Utc::now()).await
    }

    /// Claim with an explicit `now`. `now` drives the expiry gate and
    /// `boundAt`; store-side TTL still runs on the store's own clock.
    pub async fn claim_at(
        &self,
        request: &ClaimRequest,
        now: DateTime<Utc>,
    ) -> Result<ClaimGrant, ActivationError> {
        let started = Instant::now();
        let result = self.run_claim(request, now).await;

        let outcome = match &result {
            Ok(grant) => grant.outcome.as_str(),
            Err(err) => err.code().as_str(),
        };
        metrics::record_claim(outcome, started.elapsed().as_secs_f64());

        if let Err(err) = &result {
            if err.is_server_fault() {
                let correlation_id = Uuid::new_v4();
                error!(
                    %correlation_id,
                    code = request.code.as_deref().unwrap_or_default(),
                    error = %err,
                    "Claim failed"
                );
            }
        }
        result
    }

    async fn run_claim(
        &self,
        request: &ClaimRequest,
        now: DateTime<Utc>,
    ) -> Result<ClaimGrant, ActivationError> {
        let code = required(request.code.as_deref(), "code")?;
        let device_id = required(request.device_id.as_deref(), "deviceId")?;

        let expires_at = self.catalog.lookup(code).ok_or(ActivationError::InvalidCode)?;
        if expires_at < now {
            return Err(ActivationError::CodeExpired);
        }

        let candidate = Binding::new(device_id, now, expires_at);
        let outcome = match self.observe("bind_if_absent", self.store.bind_if_absent(code, &candidate).await)? {
            BindOutcome::Bound => {
                info!(code, device_id, %expires_at, "Device bound");
                ClaimOutcome::Bound
            }
            BindOutcome::Existing(existing) if existing.is_held_by(device_id) => ClaimOutcome::Reconfirmed,
            BindOutcome::Existing(existing) => {
                warn!(
                    code,
                    device_id,
                    bound_device = %existing.device_id,
                    "Code already bound to another device"
                );
                return Err(ActivationError::AlreadyBound);
            }
        };

        let claims = TokenClaims::new(
            code,
            device_id,
            request.host.as_deref().unwrap_or_default(),
            request.ua.as_deref().unwrap_or_default(),
            expires_at,
        );
        let issued = self.issuer.issue(claims)?;

        Ok(ClaimGrant {
            token: issued.token,
            claims: issued.claims,
            expires_at,
            outcome,
        })
    }

    /// Delete the binding for `code` if `admin_secret` matches.
    ///
    /// Returns whether a binding existed. Success does not depend on it.
    pub async fn unbind(&self, code: Option<&str>, admin_secret: Option<&str>) -> Result<bool, ActivationError> {
        let result = self.run_unbind(code, admin_secret).await;

        match &result {
            Ok(_) => metrics::record_unbind("UNBOUND"),
            Err(err) => {
                metrics::record_unbind(err.code().as_str());
                if err.is_server_fault() {
                    let correlation_id = Uuid::new_v4();
                    error!(%correlation_id, code = code.unwrap_or_default(), error = %err, "Unbind failed");
                }
            }
        }
        result
    }

    async fn run_unbind(&self, code: Option<&str>, admin_secret: Option<&str>) -> Result<bool, ActivationError> {
        let code = required(code, "params")?;

        // Absent and wrong secrets are indistinguishable to the caller.
        let supplied = admin_secret.unwrap_or_default();
        let expected = self.admin_secret.expose_secret().as_bytes();
        if supplied.is_empty() || !bool::from(supplied.as_bytes().ct_eq(expected)) {
            warn!(code, "Unbind rejected: admin secret missing or mismatched");
            return Err(ActivationError::Forbidden);
        }

        let existed = self.observe("delete", self.store.delete(code).await)?;
        info!(code, existed, "Binding removed by admin");
        Ok(existed)
    }

    fn observe<T>(&self, operation: &str, result: Result<T, PlatformError>) -> Result<T, PlatformError> {
        let status = match &result {
            Ok(_) => "ok",
            Err(e) if e.is_retryable() => "unavailable",
            Err(_) => "error",
        };
        metrics::record_store_operation(self.store.backend(), operation, status);
        result
    }
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, ActivationError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ActivationError::MissingField(field)),
    }
}
