//! Client configuration module
//!
//! Provides the configuration consumed by [`crate::client::ForumClient`].

use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

/// Default forum server address
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of the forum server, without the `/api` suffix
    pub server_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// Bearer token sent with every request, if signed in
    pub token: Option<String>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.server_url.scheme() {
            "http" | "https" => {}
            other => return Err(ConfigError::InvalidUrl(format!("unsupported scheme '{}'", other))),
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::MissingValue("timeout"));
        }
        Ok(())
    }

    /// Absolute URL of an API path such as `/api/posts`
    pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
        self.server_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ConfigError::InvalidUrl(e.to_string()))
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    timeout: Option<Duration>,
    token: Option<String>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the bearer token
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let raw = self.server_url.unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        // Joining relative paths needs a trailing slash on the base
        let with_slash = if raw.ends_with('/') { raw } else { format!("{}/", raw) };
        let server_url = Url::parse(&with_slash).map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;

        let config = AppConfig {
            server_url,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            token: self.token,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}
