//! Cutover client configuration.
//!
//! Provides the endpoint, credentials, and timeout settings for the Cutover
//! API client. Configuration is loaded from environment variables; the base
//! URL and API token have no defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required environment variable.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the Cutover API client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutoverConfig {
    /// Cutover API endpoint.
    pub endpoint: ServiceEndpoint,

    /// Request timeout in seconds, applied to every individual request.
    pub default_timeout_secs: u64,

    /// Whether to verify TLS certificates (disable only for testing).
    pub verify_tls: bool,
}

impl CutoverConfig {
    /// Create a configuration for the given base URL and API token.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: ServiceEndpoint {
                base_url: base_url.into(),
                api_key: Some(api_key.into()),
                core_url: None,
            },
            default_timeout_secs: DEFAULT_TIMEOUT_SECS,
            verify_tls: true,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CUTOVER_BASE_URL`: Cutover API URL (required)
    /// - `CUTOVER_API_TOKEN`: Bearer token for the API (required)
    /// - `CUTOVER_CORE_URL`: Value forwarded in the `Core-Url` header
    /// - `CUTOVER_TIMEOUT_SECS`: Request timeout in seconds (default: 30)
    /// - `CUTOVER_VERIFY_TLS`: Whether to verify TLS (default: true)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("CUTOVER_BASE_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("CUTOVER_BASE_URL".to_string()))?;
        let api_key = lookup("CUTOVER_API_TOKEN")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("CUTOVER_API_TOKEN".to_string()))?;

        let default_timeout_secs = match lookup("CUTOVER_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "CUTOVER_TIMEOUT_SECS".to_string(),
                message: format!("expected a whole number of seconds, got '{}'", raw),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            endpoint: ServiceEndpoint {
                base_url,
                api_key: Some(api_key),
                core_url: lookup("CUTOVER_CORE_URL").filter(|s| !s.is_empty()),
            },
            default_timeout_secs,
            verify_tls: lookup("CUTOVER_VERIFY_TLS")
                .map(|s| s != "false" && s != "0")
                .unwrap_or(true),
        })
    }

    /// Get the request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }
}

/// Configuration for the remote service endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    /// Base URL for the service (e.g., "https://api.cutover.com").
    pub base_url: String,

    /// API token sent as a bearer credential.
    pub api_key: Option<String>,

    /// Optional core URL forwarded in the `Core-Url` header.
    pub core_url: Option<String>,
}

impl ServiceEndpoint {
    /// Build a full URL by appending a path to the base URL.
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Check if API key authentication is available.
    pub fn has_auth(&self) -> bool {
        self.api_key.is_some()
    }
}
