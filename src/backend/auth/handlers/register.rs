/**
 * Register Handler
 *
 * This module implements the user registration handler for POST /api/auth/register.
 *
 * # Registration Process
 *
 * 1. Normalize and validate the request (username, email, password strength)
 * 2. Reject a username or email that is already taken
 * 3. Hash the password with bcrypt
 * 4. Create the user and return it with a JWT token
 */
use axum::{extract::State, http::StatusCode, response::Json};

use crate::backend::auth::users::hash_password;
use crate::backend::error::BackendResult;
use crate::backend::middleware::JsonBody;
use crate::backend::server::state::AppState;
use crate::backend::store::{NewUser, StoreError};
use crate::shared::user::{AuthResponse, RegisterRequest, Role};
use crate::shared::validation::check;

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - Validation failure, or username/email already in use
/// * `500 Internal Server Error` - If hashing, token signing or storage fails
///
/// # Example Request
///
/// ```http
/// POST /api/auth/register HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "username": "forum_fan",
///   "email": "fan@example.com",
///   "password": "Secret123"
/// }
/// ```
pub async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> BackendResult<(StatusCode, Json<AuthResponse>)> {
    let request = request.normalized();
    check(&request)?;
    tracing::info!("Register request for: {}", request.username);

    if state.store.find_user_by_username(&request.username).await?.is_some() {
        tracing::warn!("Username already in use: {}", request.username);
        return Err(StoreError::Duplicate { field: "username" }.into());
    }
    if state.store.find_user_by_email(&request.email).await?.is_some() {
        tracing::warn!("Email already in use: {}", request.email);
        return Err(StoreError::Duplicate { field: "email" }.into());
    }

    let password_hash = hash_password(&request.password, state.config.bcrypt_cost)?;
    let user = state
        .store
        .create_user(NewUser {
            username: request.username,
            email: request.email,
            password_hash,
            role: Role::User,
        })
        .await?;

    let token = state.keys.create_token(user.id, &user.email)?;
    tracing::info!("User registered: {} ({})", user.username, user.id);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Registration successful".to_string(),
            user: user.profile(),
            token,
        }),
    ))
}
