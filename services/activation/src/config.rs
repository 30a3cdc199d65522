//! Centralized configuration for the activation service.
//!
//! All configuration is loaded from environment variables and validated
//! at startup. Development fallbacks for secrets and the catalog are tracked
//! in [`Config::insecure_defaults`] and refused outright in production.

use std::env;
use std::str::FromStr;

use rust_common::{LogFormat, TracingConfig};
use secrecy::SecretString;

use crate::catalog::CodeCatalog;
use crate::error::ActivationError;

/// Signing secret fallback for local development.
pub const DEFAULT_SIGN_SECRET: &str = "CHANGE_ME_STRONG_SECRET";
/// Admin secret fallback for local development.
pub const DEFAULT_ADMIN_SECRET: &str = "CHANGE_ME_ADMIN_SECRET";

const SERVICE_NAME: &str = "activation-service";

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Local development, fallbacks allowed
    Development,
    /// Production, fallbacks are fatal
    Production,
}

impl FromStr for Environment {
    type Err = ActivationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ActivationError::config(format!("Invalid APP_ENV: {other}"))),
        }
    }
}

/// Binding store backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-process map
    Memory,
    /// Redis server
    Redis {
        /// Connection URL
        url: String,
    },
}

impl StoreBackend {
    /// Backend name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Redis { .. } => "redis",
        }
    }
}

/// Activation service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    // Server settings
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Deployment environment
    pub environment: Environment,

    // Secrets
    /// HMAC key for token signing
    pub sign_secret: SecretString,
    /// Shared secret for admin unbind
    pub admin_secret: SecretString,

    /// Activation code catalog
    pub catalog: CodeCatalog,
    /// Binding store backend
    pub store: StoreBackend,
    /// Logging setup
    pub tracing: TracingConfig,

    /// Names of the variables that fell back to development values
    pub insecure_defaults: Vec<&'static str>,
}

impl Config {
    /// Load configuration from `.env` and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is invalid, the catalog does not parse,
    /// or a development fallback is used in production.
    pub fn from_env() -> Result<Self, ActivationError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ActivationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut insecure_defaults = Vec::new();

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_var(&var, "PORT", 3000)?;
        let environment = parse_var(&var, "APP_ENV", Environment::Development)?;

        let sign_secret = var("SIGN_SECRET").unwrap_or_else(|| {
            insecure_defaults.push("SIGN_SECRET");
            DEFAULT_SIGN_SECRET.to_string()
        });
        let admin_secret = var("UNBIND_ADMIN_SECRET").unwrap_or_else(|| {
            insecure_defaults.push("UNBIND_ADMIN_SECRET");
            DEFAULT_ADMIN_SECRET.to_string()
        });

        let catalog = match var("ACTIVATION_CODES") {
            Some(raw) => CodeCatalog::from_json(&raw)?,
            None => {
                insecure_defaults.push("ACTIVATION_CODES");
                CodeCatalog::development()?
            }
        };

        let store = match var("STORE_BACKEND")
            .unwrap_or_else(|| "memory".to_string())
            .to_lowercase()
            .as_str()
        {
            "memory" => StoreBackend::Memory,
            "redis" => StoreBackend::Redis {
                url: var("REDIS_URL").unwrap_or_else(|| "redis://127.0.0.1:6379".to_string()),
            },
            other => {
                return Err(ActivationError::config(format!("Invalid STORE_BACKEND: {other}")));
            }
        };

        let format = match var("LOG_FORMAT") {
            Some(raw) => LogFormat::from_str(&raw).map_err(ActivationError::config)?,
            None => LogFormat::Json,
        };
        let tracing = TracingConfig::default()
            .with_service_name(SERVICE_NAME)
            .with_log_level(var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()))
            .with_format(format);

        if environment == Environment::Production && !insecure_defaults.is_empty() {
            return Err(ActivationError::config(format!(
                "production requires explicit values for: {}",
                insecure_defaults.join(", ")
            )));
        }

        Ok(Self {
            host,
            port,
            environment,
            sign_secret: SecretString::from(sign_secret),
            admin_secret: SecretString::from(admin_secret),
            catalog,
            store,
            tracing,
            insecure_defaults,
        })
    }

    /// Socket address string to listen on.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse variable with default value.
fn parse_var<T, V>(var: &V, name: &str, default: T) -> Result<T, ActivationError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    V: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(val) => val
            .trim()
            .parse()
            .map_err(|e| ActivationError::config(format!("Invalid {}: {}", name, e))),
        None => Ok(default),
    }
}
