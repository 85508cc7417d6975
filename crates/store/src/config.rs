//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PINSTICK_PROJECT_ID` - Backend project identifier
//! - `PINSTICK_AUTH_DOMAIN` - Auth domain for the backend project
//! - `PINSTICK_API_KEY` - Backend API key
//!
//! ## Optional
//! - `PINSTICK_SENTRY_DSN` - Sentry error tracking DSN
//! - `PINSTICK_SENTRY_ENVIRONMENT` - Sentry environment tag

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Store application configuration.
#[derive(Clone)]
pub struct StoreConfig {
    /// Backend project identifier
    pub project_id: String,
    /// Auth domain for the backend project
    pub auth_domain: String,
    /// Backend API key
    pub api_key: SecretString,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("project_id", &self.project_id)
            .field("auth_domain", &self.auth_domain)
            .field("api_key", &"[REDACTED]")
            .field("sentry_dsn", &self.sentry_dsn)
            .field("sentry_environment", &self.sentry_environment)
            .finish()
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` for absent required variables
    /// and `ConfigError::InsecureSecret` when the API key looks like a
    /// placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        let project_id = required("PINSTICK_PROJECT_ID")?;
        let auth_domain = required("PINSTICK_AUTH_DOMAIN")?;
        let api_key = SecretString::from(required("PINSTICK_API_KEY")?);
        validate_secret("PINSTICK_API_KEY", api_key.expose_secret())?;

        Ok(Self {
            project_id,
            auth_domain,
            api_key,
            sentry_dsn: std::env::var("PINSTICK_SENTRY_DSN").ok(),
            sentry_environment: std::env::var("PINSTICK_SENTRY_ENVIRONMENT").ok(),
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

/// Reject secrets that look like unfilled placeholders.
fn validate_secret(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::InsecureSecret(
            name.to_owned(),
            "value is empty".to_owned(),
        ));
    }

    let lowered = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lowered.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                name.to_owned(),
                format!("value contains placeholder pattern '{pattern}'"),
            ));
        }
    }

    Ok(())
}
