/**
 * Server Configuration
 *
 * This module handles loading of the server configuration and the storage
 * backend it selects.
 *
 * # Configuration Sources
 *
 * In increasing priority:
 * 1. Built-in defaults
 * 2. A TOML file named by `FORUM_CONFIG`, else `forum.toml` if present
 * 3. Environment variables (a `.env` file is loaded first via `dotenv`)
 *
 * | Variable                   | Default                  |
 * |----------------------------|--------------------------|
 * | `SERVER_HOST`              | `0.0.0.0`                |
 * | `SERVER_PORT`              | `5000`                   |
 * | `DATABASE_URL`             | unset (in-memory store)  |
 * | `DATABASE_MAX_CONNECTIONS` | `10`                     |
 * | `JWT_SECRET`               | development fallback     |
 * | `JWT_TTL_DAYS`             | `7`                      |
 * | `CORS_ALLOWED_ORIGINS`     | `http://localhost:3000`  |
 * | `BODY_LIMIT_BYTES`         | `10485760`               |
 * | `BCRYPT_COST`              | `12`                     |
 */
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::auth::sessions::TokenKeys;
use crate::backend::store::{ForumStore, MemoryStore, PgStore, StoreError};

/// Secret used when `JWT_SECRET` is not configured
const DEV_JWT_SECRET: &str = "forum-dev-secret-change-in-production";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ServerConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {name}: '{value}'")]
    InvalidEnv { name: &'static str, value: String },
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// PostgreSQL connection string; `None` selects the in-memory store
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret: Option<String>,
    pub jwt_ttl_days: i64,
    pub cors_allowed_origins: Vec<String>,
    pub body_limit_bytes: usize,
    pub bcrypt_cost: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            database_url: None,
            database_max_connections: 10,
            jwt_secret: None,
            jwt_ttl_days: 7,
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
            body_limit_bytes: 10 * 1024 * 1024,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ServerConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ServerConfigError::InvalidEnv { name, value })
}

impl ServerConfig {
    /// Load defaults, then the config file, then the environment
    pub fn load() -> Result<Self, ServerConfigError> {
        dotenv::dotenv().ok();

        let path = std::env::var("FORUM_CONFIG")
            .map(PathBuf::from)
            .ok()
            .or_else(|| Some(PathBuf::from("forum.toml")).filter(|p| p.exists()));

        let mut config = match path {
            Some(path) => {
                tracing::info!("Loading configuration from {}", path.display());
                Self::from_toml_file(&path)?
            }
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        config.token_ttl()?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ServerConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ServerConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ServerConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Override fields from environment-style lookups
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ServerConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.port = parse_env("SERVER_PORT", port)?;
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            self.database_url = Some(url);
        }
        if let Some(max) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database_max_connections = parse_env("DATABASE_MAX_CONNECTIONS", max)?;
        }
        if let Some(secret) = lookup("JWT_SECRET").filter(|v| !v.is_empty()) {
            self.jwt_secret = Some(secret);
        }
        if let Some(days) = lookup("JWT_TTL_DAYS") {
            self.jwt_ttl_days = parse_env("JWT_TTL_DAYS", days)?;
            self.token_ttl()?;
        }
        if let Some(origins) = lookup("CORS_ALLOWED_ORIGINS") {
            self.cors_allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(limit) = lookup("BODY_LIMIT_BYTES") {
            self.body_limit_bytes = parse_env("BODY_LIMIT_BYTES", limit)?;
        }
        if let Some(cost) = lookup("BCRYPT_COST") {
            self.bcrypt_cost = parse_env("BCRYPT_COST", cost)?;
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Token lifetime; `jwt_ttl_days` must be positive and representable
    pub fn token_ttl(&self) -> Result<TimeDelta, ServerConfigError> {
        TimeDelta::try_days(self.jwt_ttl_days)
            .filter(|_| self.jwt_ttl_days > 0)
            .ok_or_else(|| ServerConfigError::InvalidEnv {
                name: "JWT_TTL_DAYS",
                value: self.jwt_ttl_days.to_string(),
            })
    }

    /// JWT keys from the configured secret, falling back to a development secret
    pub fn token_keys(&self) -> TokenKeys {
        let secret = match self.jwt_secret.as_deref() {
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT_SECRET not set. Using an insecure development secret.");
                DEV_JWT_SECRET
            }
        };
        let ttl = self.token_ttl().unwrap_or_else(|err| {
            tracing::warn!("{}. Using the default of 7 days.", err);
            TimeDelta::days(7)
        });
        TokenKeys::new(secret, ttl)
    }
}

/// Build the storage backend selected by the configuration
///
/// PostgreSQL when `database_url` is set (connection and migration failures
/// are returned), otherwise the in-memory store.
pub async fn load_store(config: &ServerConfig) -> Result<Arc<dyn ForumStore>, StoreError> {
    match config.database_url.as_deref() {
        Some(url) => {
            tracing::info!("Connecting to database...");
            let store = PgStore::connect(url, config.database_max_connections).await?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set. Using the in-memory store; data will not persist.");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
