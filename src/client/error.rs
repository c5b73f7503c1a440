/**
 * Client Error Types
 *
 * Failures seen by `ForumClient`: transport errors, error responses from the
 * server (decoded from the JSON error body), configuration problems, and
 * requests rejected locally by the shared validation rules.
 */
use serde::Deserialize;
use thiserror::Error;

use crate::shared::config::ConfigError;
use crate::shared::error::{FieldError, SharedError};

#[derive(Debug, Error)]
pub enum ClientError {
    /// Network, timeout or response decoding failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        message: String,
        details: Vec<FieldError>,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Request rejected before it was sent
    #[error(transparent)]
    Shared(#[from] SharedError),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    details: Vec<FieldError>,
}

impl ClientError {
    /// Build an `Api` error from a status and raw response body
    ///
    /// Bodies that are not the server's JSON error shape are kept verbatim
    /// as the message.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => Self::Api {
                status,
                message: parsed.error,
                details: parsed.details,
            },
            Err(_) => Self::Api {
                status,
                message: body.trim().to_string(),
                details: Vec::new(),
            },
        }
    }

    /// HTTP status of an `Api` error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
