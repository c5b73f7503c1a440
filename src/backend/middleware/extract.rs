/**
 * Request Extractors
 *
 * Wrappers around axum's `Json`, `Query` and `Path` extractors that reject
 * with `BackendError`, so malformed input gets the same JSON error body as
 * every other failure.
 */
use axum::{
    extract::{FromRequest, FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::shared::error::SharedError;

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(BackendError))]
pub struct JsonBody<T>(pub T);

/// Query string parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(BackendError))]
pub struct QueryParams<T>(pub T);

/// A single UUID path segment (`/{id}`, `/post/{postId}`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceId(pub Uuid);

impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| BackendError::bad_request(e.body_text()))?;

        Uuid::parse_str(&raw).map(ResourceId).map_err(|_| {
            tracing::warn!("Rejected malformed id: {}", raw);
            SharedError::invalid_id("id", raw).into()
        })
    }
}
