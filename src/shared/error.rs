//! Shared Error Types
//!
//! This module defines error types that are shared between the server and the
//! API client. These errors represent failures that can be detected on either
//! side of the wire, before any storage is touched.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `ValidationError` - One or more request fields failed validation
//! - `InvalidId` - A resource identifier is not a valid UUID
//!
//! # Usage
//!
//! ```rust
//! use forum::shared::error::SharedError;
//!
//! let error = SharedError::validation("title", "Title is required");
//! assert!(error.to_string().contains("title"));
//! ```
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending field
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Shared error types that can occur on both the server and the client
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation failed: {}", summarize(.errors))]
    ValidationError {
        /// Every field that failed, in declaration order
        errors: Vec<FieldError>,
    },

    /// Malformed resource identifier
    #[error("Invalid {field}: '{value}' is not a valid ID")]
    InvalidId {
        /// Parameter or field carrying the identifier
        field: String,
        /// The rejected raw value
        value: String,
    },
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a validation error for a single field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            errors: vec![FieldError::new(field, message)],
        }
    }

    /// Create a validation error from a list of field failures
    pub fn validation_errors(errors: Vec<FieldError>) -> Self {
        Self::ValidationError { errors }
    }

    /// Create an invalid identifier error
    pub fn invalid_id(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidId {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Field-level details, if any
    pub fn details(&self) -> Vec<FieldError> {
        match self {
            Self::ValidationError { errors } => errors.clone(),
            Self::InvalidId { field, .. } => vec![FieldError::new(field.clone(), "Invalid ID")],
            Self::SerializationError { .. } => Vec::new(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
