//! Authentication API integration tests
//!
//! Tests for registration, login, the current user, password changes and
//! profile updates.

use axum::http::StatusCode;
use forum::shared::user::{AuthResponse, MeResponse, ProfileResponse, Role};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{assert_error, assert_validation_error, detail_fields, TestApp, TEST_PASSWORD};

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "username": "  alice  ",
            "email": "Alice@Example.COM",
            "password": TEST_PASSWORD,
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: AuthResponse = response.json();
    assert_eq!(body.message, "Registration successful");
    assert_eq!(body.user.username, "alice");
    assert_eq!(body.user.email, "alice@example.com");
    assert_eq!(body.user.role, Role::User);
    assert!(!body.token.is_empty());

    let raw: Value = response.json();
    assert!(raw["user"].get("password").is_none());
    assert!(raw["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_register_validation_reports_every_field() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "username": "a",
            "email": "not-an-email",
            "password": "weak",
        }))
        .await;

    assert_error(&response, StatusCode::BAD_REQUEST, "Validation failed");
    let fields = detail_fields(&response);
    assert!(fields.contains(&"username".to_string()));
    assert!(fields.contains(&"email".to_string()));
    assert!(fields.contains(&"password".to_string()));
}

#[tokio::test]
async fn test_register_rejects_bad_username_characters() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "username": "bad name!",
            "email": "bad@example.com",
            "password": TEST_PASSWORD,
        }))
        .await;

    assert_validation_error(&response, "username");
}

#[tokio::test]
async fn test_register_duplicate_username_checked_first() {
    let app = TestApp::new();
    let alice = app.register("alice").await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "username": "alice",
            "email": alice.email,
            "password": TEST_PASSWORD,
        }))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "Username is already in use");

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "username": "alice2",
            "email": "ALICE@example.com",
            "password": TEST_PASSWORD,
        }))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "Email is already in use");
}

#[tokio::test]
async fn test_register_malformed_json() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/auth/register")
        .content_type("application/json")
        .text("{not json")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new();
    let alice = app.register("alice").await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "ALICE@example.com", "password": alice.password }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: AuthResponse = response.json();
    assert_eq!(body.message, "Login successful");
    assert_eq!(body.user.id, alice.id);
    assert!(!body.token.is_empty());
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_email_look_the_same() {
    let app = TestApp::new();
    let alice = app.register("alice").await;

    let wrong_password = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": alice.email, "password": "Wrong1234" }))
        .await;
    assert_error(&wrong_password, StatusCode::UNAUTHORIZED, "Invalid email or password");

    let unknown = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "nobody@example.com", "password": TEST_PASSWORD }))
        .await;
    assert_error(&unknown, StatusCode::UNAUTHORIZED, "Invalid email or password");
}

#[tokio::test]
async fn test_login_deactivated_account() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    app.deactivate(&alice).await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": alice.email, "password": alice.password }))
        .await;

    assert_error(&response, StatusCode::FORBIDDEN, "Account is deactivated");
}

#[tokio::test]
async fn test_deactivated_account_token_rejected() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    app.deactivate(&alice).await;

    let response = app
        .server
        .get("/api/auth/me")
        .authorization_bearer(&alice.token)
        .await;

    assert_error(&response, StatusCode::UNAUTHORIZED, "Invalid token");
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = TestApp::new();

    let response = app.server.get("/api/auth/me").await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "Authentication required");

    let response = app
        .server
        .get("/api/auth/me")
        .authorization_bearer("not-a-jwt")
        .await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "Invalid token");
}

#[tokio::test]
async fn test_me_returns_profile() {
    let app = TestApp::new();
    let alice = app.register("alice").await;

    let response = app
        .server
        .get("/api/auth/me")
        .authorization_bearer(&alice.token)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: MeResponse = response.json();
    assert_eq!(body.user.id, alice.id);
    assert_eq!(body.user.username, "alice");
    assert!(body.user.created_at.is_some());
}

#[tokio::test]
async fn test_token_from_other_secret_rejected() {
    let app = TestApp::new();
    let alice = app.register("alice").await;

    let other = TestApp::with_config(forum::backend::server::ServerConfig {
        jwt_secret: Some("another-secret".to_string()),
        ..crate::common::test_config()
    });

    let response = other
        .server
        .get("/api/auth/me")
        .authorization_bearer(&alice.token)
        .await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "Invalid token");
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::new();
    let alice = app.register("alice").await;

    let response = app
        .server
        .post("/api/auth/change-password")
        .authorization_bearer(&alice.token)
        .json(&json!({ "currentPassword": alice.password, "newPassword": "NewPassword2" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Password changed successfully");

    let old = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": alice.email, "password": alice.password }))
        .await;
    assert_eq!(old.status_code(), StatusCode::UNAUTHORIZED);

    let new = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": alice.email, "password": "NewPassword2" }))
        .await;
    assert_eq!(new.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_change_password_wrong_current() {
    let app = TestApp::new();
    let alice = app.register("alice").await;

    let response = app
        .server
        .post("/api/auth/change-password")
        .authorization_bearer(&alice.token)
        .json(&json!({ "currentPassword": "Wrong1234", "newPassword": "NewPassword2" }))
        .await;

    assert_error(&response, StatusCode::UNAUTHORIZED, "Current password is incorrect");
}

#[tokio::test]
async fn test_change_password_same_as_wrong_current() {
    let app = TestApp::new();
    let alice = app.register("alice").await;

    // unchanged password is rejected before the current one is checked
    let response = app
        .server
        .post("/api/auth/change-password")
        .authorization_bearer(&alice.token)
        .json(&json!({ "currentPassword": "Wrong1234", "newPassword": "Wrong1234" }))
        .await;

    assert_validation_error(&response, "newPassword");
}

#[tokio::test]
async fn test_change_password_weak_new_password() {
    let app = TestApp::new();
    let alice = app.register("alice").await;

    let response = app
        .server
        .post("/api/auth/change-password")
        .authorization_bearer(&alice.token)
        .json(&json!({ "currentPassword": alice.password, "newPassword": "alllowercase" }))
        .await;

    assert_validation_error(&response, "newPassword");
}

#[tokio::test]
async fn test_update_profile() {
    let app = TestApp::new();
    let alice = app.register("alice").await;

    let response = app
        .server
        .put("/api/auth/profile")
        .authorization_bearer(&alice.token)
        .json(&json!({ "username": "alice_renamed", "email": "NEW@example.com" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ProfileResponse = response.json();
    assert_eq!(body.message, "Profile updated");
    assert_eq!(body.user.username, "alice_renamed");
    assert_eq!(body.user.email, "new@example.com");
}

#[tokio::test]
async fn test_update_profile_keeping_own_values() {
    let app = TestApp::new();
    let alice = app.register("alice").await;

    let response = app
        .server
        .put("/api/auth/profile")
        .authorization_bearer(&alice.token)
        .json(&json!({ "username": "alice", "email": alice.email }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_update_profile_taken_by_another_user() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    let response = app
        .server
        .put("/api/auth/profile")
        .authorization_bearer(&alice.token)
        .json(&json!({ "username": "bob" }))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "Username is already in use");

    let response = app
        .server
        .put("/api/auth/profile")
        .authorization_bearer(&alice.token)
        .json(&json!({ "email": bob.email }))
        .await;
    assert_error(&response, StatusCode::BAD_REQUEST, "Email is already in use");
}
