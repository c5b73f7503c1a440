/**
 * Update Profile Handler
 *
 * PUT /api/auth/profile changes the caller's username and/or email. A value
 * already held by another account is rejected; keeping one's own is fine.
 */
use axum::{extract::State, response::Json};

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::{AuthUser, JsonBody};
use crate::backend::server::state::AppState;
use crate::backend::store::{ProfileChanges, StoreError};
use crate::shared::user::{ProfileResponse, UpdateProfileRequest};
use crate::shared::validation::check;

pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(request): JsonBody<UpdateProfileRequest>,
) -> BackendResult<Json<ProfileResponse>> {
    let request = request.normalized();
    check(&request)?;

    if let Some(username) = request.username.as_deref() {
        let taken = state.store.find_user_by_username(username).await?;
        if taken.is_some_and(|other| other.id != user.id) {
            tracing::warn!("Username already in use: {}", username);
            return Err(StoreError::Duplicate { field: "username" }.into());
        }
    }
    if let Some(email) = request.email.as_deref() {
        let taken = state.store.find_user_by_email(email).await?;
        if taken.is_some_and(|other| other.id != user.id) {
            tracing::warn!("Email already in use: {}", email);
            return Err(StoreError::Duplicate { field: "email" }.into());
        }
    }

    let changes = ProfileChanges {
        username: request.username,
        email: request.email,
    };
    let updated = state
        .store
        .update_profile(user.id, changes)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    tracing::info!("Profile updated for user: {}", updated.id);
    Ok(Json(ProfileResponse {
        message: "Profile updated".to_string(),
        user: updated.profile(),
    }))
}
