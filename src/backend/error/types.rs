/**
 * Backend Error Types
 *
 * This module defines error types specific to the backend server.
 * These errors are used in HTTP handlers and can be converted to HTTP responses.
 *
 * # Error Types
 *
 * - `HandlerError` - A request-level failure with an explicit status
 *   (authentication, ownership, missing resources)
 * - `SharedError` - Validation and malformed-id failures from the shared module
 * - `Store` - Storage failures and uniqueness violations
 * - `Token` / `PasswordHash` - Failures of the JWT and bcrypt libraries
 *
 * Internal failures (storage, token signing, hashing) are reported to the
 * client as a generic 500 message; the detail only goes to the log.
 */
use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::store::StoreError;
use crate::shared::error::{FieldError, SharedError};

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use axum::http::StatusCode;
/// use forum::backend::error::BackendError;
///
/// let err = BackendError::not_found("Post not found");
/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error (e.g. missing token, not the owner, unknown id)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Shared error (validation, malformed ids, bad JSON)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Storage error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// JWT signing failure
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// bcrypt failure
    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),
}

pub type BackendResult<T> = Result<T, BackendError>;

const INTERNAL_MESSAGE: &str = "Internal server error";

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    /// Get the HTTP status code for this error
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `SharedError` - 400 Bad Request
    /// - `Store` - 400 for duplicates, otherwise 500
    /// - `Token`, `PasswordHash` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::SharedError(_) => StatusCode::BAD_REQUEST,
            Self::Store(StoreError::Duplicate { .. }) => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Token(_) | Self::PasswordHash(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the client
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::SharedError(SharedError::ValidationError { .. }) => "Validation failed".to_string(),
            Self::SharedError(err) => err.to_string(),
            Self::Store(StoreError::Duplicate { field }) => match *field {
                "email" => "Email is already in use".to_string(),
                _ => "Username is already in use".to_string(),
            },
            Self::Store(_) | Self::Token(_) | Self::PasswordHash(_) => INTERNAL_MESSAGE.to_string(),
        }
    }

    /// Field-level details for validation failures
    pub fn details(&self) -> Vec<FieldError> {
        match self {
            Self::SharedError(err) => err.details(),
            _ => Vec::new(),
        }
    }
}
