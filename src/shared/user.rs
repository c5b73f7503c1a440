/**
 * Account Payloads
 *
 * Roles, public user views and the request/response bodies of the
 * `/api/auth` endpoints. Passwords only ever travel inbound.
 */
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::shared::validation::{password_strength, trim_in_place, trim_opt_in_place, username_chars};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Moderator,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Author reference embedded in posts and comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub username: String,
    /// Only included on the post detail view
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// User information that is safe to return to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 2, max = 30, message = "Username must be between 2 and 30 characters"),
        custom(function = "username_chars")
    )]
    pub username: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(
        length(min = 6, message = "Password must be at least 6 characters"),
        custom(function = "password_strength")
    )]
    pub password: String,
}

impl RegisterRequest {
    pub fn normalized(mut self) -> Self {
        trim_in_place(&mut self.username);
        self.email = normalize_email(&self.email);
        self
    }
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Please enter your password"))]
    pub password: String,
}

impl LoginRequest {
    pub fn normalized(mut self) -> Self {
        self.email = normalize_email(&self.email);
        self
    }
}

/// Change password request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Please enter your current password"))]
    pub current_password: String,
    #[validate(
        length(min = 6, message = "New password must be at least 6 characters"),
        custom(function = "password_strength")
    )]
    pub new_password: String,
}

/// Profile update request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        length(min = 2, max = 30, message = "Username must be between 2 and 30 characters"),
        custom(function = "username_chars")
    )]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: Option<String>,
}

impl UpdateProfileRequest {
    pub fn normalized(mut self) -> Self {
        trim_opt_in_place(&mut self.username);
        self.email = self.email.as_deref().map(normalize_email);
        self
    }
}

/// Emails are compared case-insensitively
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Register/login response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserProfile,
    /// JWT token for the `Authorization: Bearer` header
    pub token: String,
}

/// `GET /api/auth/me` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: UserProfile,
}

/// Profile update response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub message: String,
    pub user: UserProfile,
}

/// Plain acknowledgement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
