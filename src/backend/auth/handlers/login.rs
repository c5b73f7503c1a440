/**
 * Login Handler
 *
 * This module implements the user authentication handler for POST /api/auth/login.
 *
 * # Authentication Process
 *
 * 1. Look up user by email
 * 2. Verify password using bcrypt
 * 3. Refuse deactivated accounts
 * 4. Generate JWT token and return it with the user profile
 *
 * Unknown emails and wrong passwords get the same 401 response.
 */
use axum::{extract::State, response::Json};

use crate::backend::auth::users::verify_password;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::JsonBody;
use crate::backend::server::state::AppState;
use crate::shared::user::{AuthResponse, LoginRequest};
use crate::shared::validation::check;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - Validation failure
/// * `401 Unauthorized` - If user is not found or password is incorrect
/// * `403 Forbidden` - If the account is deactivated
///
/// # Example Response
///
/// ```json
/// {
///   "message": "Login successful",
///   "user": { "id": "…", "username": "forum_fan", "email": "fan@example.com", "role": "user" },
///   "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..."
/// }
/// ```
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> BackendResult<Json<AuthResponse>> {
    let request = request.normalized();
    check(&request)?;
    tracing::info!("Login request for: {}", request.email);

    let user = state
        .store
        .find_user_by_email(&request.email)
        .await?
        .ok_or_else(|| {
            tracing::warn!("User not found: {}", request.email);
            BackendError::unauthorized(INVALID_CREDENTIALS)
        })?;

    if !verify_password(&request.password, &user.password_hash)? {
        tracing::warn!("Invalid password for user: {}", request.email);
        return Err(BackendError::unauthorized(INVALID_CREDENTIALS));
    }

    if !user.is_active {
        tracing::warn!("Login attempt for deactivated account: {}", user.id);
        return Err(BackendError::forbidden("Account is deactivated"));
    }

    let token = state.keys.create_token(user.id, &user.email)?;
    tracing::info!("User logged in: {} ({})", user.username, user.id);

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user: user.profile(),
        token,
    }))
}
