/**
 * Error Conversion
 *
 * `IntoResponse` for `BackendError`, plus conversions from axum extractor
 * rejections so malformed bodies and query strings produce the same JSON
 * error shape as every other failure.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "Validation failed",
 *   "status": 400,
 *   "details": [{ "field": "title", "message": "Title is required" }]
 * }
 * ```
 *
 * `details` is omitted when empty.
 */
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::backend::error::types::BackendError;
use crate::shared::error::{FieldError, SharedError};

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    status: u16,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<FieldError>,
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = ErrorBody {
            error: self.message(),
            status: status.as_u16(),
            details: self.details(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for BackendError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected JSON body: {}", rejection.body_text());
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return BackendError::handler(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large");
        }
        BackendError::SharedError(SharedError::serialization(rejection.body_text()))
    }
}

impl From<QueryRejection> for BackendError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::warn!("Rejected query string: {}", rejection.body_text());
        BackendError::bad_request(rejection.body_text())
    }
}
