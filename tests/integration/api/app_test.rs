//! Application-level tests: root info, fallback, CORS and body limits

use axum::http::{header, HeaderValue, Method, StatusCode};
use forum::backend::server::ServerConfig;
use serde_json::{json, Value};

use crate::common::{assert_error, test_config, TestApp, TEST_PASSWORD};

#[tokio::test]
async fn test_api_info() {
    let app = TestApp::new();

    let response = app.server.get("/").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Forum API Server");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["endpoints"]["posts"], "/api/posts");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = TestApp::new();

    let response = app.server.get("/api/nothing-here").await;
    assert_error(&response, StatusCode::NOT_FOUND, "Requested resource not found");
}

#[tokio::test]
async fn test_malformed_ids_are_bad_requests() {
    let app = TestApp::new();
    let alice = app.register("alice").await;

    let response = app.server.get("/api/comments/post/not-an-id").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app
        .server
        .delete("/api/comments/not-an-id")
        .authorization_bearer(&alice.token)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let app = TestApp::new();

    let response = app
        .server
        .method(Method::OPTIONS, "/api/posts")
        .add_header(header::ORIGIN, HeaderValue::from_static("http://localhost:3000"))
        .add_header(
            header::ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("POST"),
        )
        .await;

    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&HeaderValue::from_static("http://localhost:3000"))
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS),
        Some(&HeaderValue::from_static("true"))
    );
}

#[tokio::test]
async fn test_cors_ignores_other_origins() {
    let app = TestApp::new();

    let response = app
        .server
        .get("/api/posts")
        .add_header(header::ORIGIN, HeaderValue::from_static("http://evil.example"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let app = TestApp::with_config(ServerConfig {
        body_limit_bytes: 256,
        ..test_config()
    });

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": TEST_PASSWORD,
            "padding": "x".repeat(1024),
        }))
        .await;

    assert_error(&response, StatusCode::PAYLOAD_TOO_LARGE, "Request body too large");
}
