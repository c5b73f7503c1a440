/**
 * Change Password Handler
 *
 * POST /api/auth/change-password. The current password must match and the
 * new one must differ from it and pass the strength rules.
 */
use axum::{extract::State, response::Json};

use crate::backend::auth::users::{hash_password, verify_password};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::{AuthUser, JsonBody};
use crate::backend::server::state::AppState;
use crate::shared::error::SharedError;
use crate::shared::user::{ChangePasswordRequest, MessageResponse};
use crate::shared::validation::check;

pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(request): JsonBody<ChangePasswordRequest>,
) -> BackendResult<Json<MessageResponse>> {
    check(&request)?;

    if request.new_password == request.current_password {
        return Err(SharedError::validation(
            "newPassword",
            "New password must be different from the current password",
        )
        .into());
    }
    if !verify_password(&request.current_password, &user.password_hash)? {
        tracing::warn!("Wrong current password for user: {}", user.id);
        return Err(BackendError::unauthorized("Current password is incorrect"));
    }

    let password_hash = hash_password(&request.new_password, state.config.bcrypt_cost)?;
    if !state.store.update_password(user.id, &password_hash).await? {
        return Err(BackendError::not_found("User not found"));
    }

    tracing::info!("Password changed for user: {}", user.id);
    Ok(Json(MessageResponse::new("Password changed successfully")))
}
