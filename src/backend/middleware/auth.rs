/**
 * Authentication Extractors
 *
 * This module provides extractors for routes that need to know who is
 * calling. The JWT is read from the `Authorization: Bearer` header, verified
 * against the keys in `AppState`, and resolved to a stored, active user.
 *
 * - `AuthUser` - rejects the request with 401 when authentication fails
 * - `MaybeUser` - any failure leaves the caller anonymous
 */
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::backend::auth::users::User;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;

/// Extract the bearer token from the `Authorization` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Verify a token and load the active user it names
pub async fn authenticate(state: &AppState, token: &str) -> BackendResult<User> {
    let claims = state.keys.verify_token(token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        BackendError::unauthorized("Invalid token")
    })?;

    let user_id = claims.user_id().ok_or_else(|| {
        tracing::warn!("Token subject is not a user id: {}", claims.sub);
        BackendError::unauthorized("Invalid token")
    })?;

    match state.store.find_user(user_id).await? {
        Some(user) if user.is_active => Ok(user),
        Some(_) => {
            tracing::warn!("Token for inactive user {}", user_id);
            Err(BackendError::unauthorized("Invalid token"))
        }
        None => {
            tracing::warn!("Token for unknown user {}", user_id);
            Err(BackendError::unauthorized("Invalid token"))
        }
    }
}

/// Axum extractor for an authenticated user
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            BackendError::unauthorized("Authentication required")
        })?;

        authenticate(state, token).await.map(AuthUser)
    }
}

/// Axum extractor for an optional user
#[derive(Clone, Debug)]
pub struct MaybeUser(pub Option<User>);

impl MaybeUser {
    pub fn id(&self) -> Option<uuid::Uuid> {
        self.0.as_ref().map(|u| u.id)
    }
}

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Ok(MaybeUser(None));
        };

        match authenticate(state, token).await {
            Ok(user) => Ok(MaybeUser(Some(user))),
            Err(e) => {
                tracing::debug!("Continuing anonymously: {}", e);
                Ok(MaybeUser(None))
            }
        }
    }
}
