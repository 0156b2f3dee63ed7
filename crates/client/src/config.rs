//! Client configuration (environment-driven).

use std::time::Duration;

use thiserror::Error;

pub const ENV_API_URL: &str = "RETAILOPS_API_URL";
pub const ENV_API_TOKEN: &str = "RETAILOPS_API_TOKEN";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "RETAILOPS_HTTP_TIMEOUT_SECS";

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("RETAILOPS_HTTP_TIMEOUT_SECS must be a positive number of seconds (got '{0}')")]
    InvalidTimeout(String),
    #[error("API URL must start with http:// or https:// (got '{0}')")]
    InvalidApiUrl(String),
}

/// Where and how to reach the inventory service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: normalize_api_url(api_url.into())?,
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (env, test fixtures).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup(ENV_API_URL).unwrap_or_else(|| {
            tracing::warn!("{ENV_API_URL} not set; using {DEFAULT_API_URL}");
            DEFAULT_API_URL.to_string()
        });

        let token = lookup(ENV_API_TOKEN).filter(|t| !t.trim().is_empty());

        let timeout = match lookup(ENV_HTTP_TIMEOUT_SECS) {
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
        };

        Ok(Self {
            api_url: normalize_api_url(api_url)?,
            token,
            timeout,
        })
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Result<Self, ConfigError> {
        self.api_url = normalize_api_url(api_url.into())?;
        Ok(self)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

fn normalize_api_url(raw: String) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidApiUrl(raw));
    }
    Ok(trimmed.to_string())
}
