//! Mock forum servers for client tests
//!
//! Wraps `wiremock` so client tests can stand up a fake API and point a
//! `ForumClient` at it.

use forum::client::ForumClient;
use forum::shared::config::AppConfig;
use serde_json::{json, Value};
use wiremock::MockServer;

/// Start a mock server and a client pointed at it
pub async fn mock_forum() -> (MockServer, ForumClient) {
    let server = MockServer::start().await;
    let config = AppConfig::builder()
        .server_url(server.uri())
        .build()
        .expect("valid mock server url");
    let client = ForumClient::new(config).expect("client");
    (server, client)
}

pub fn user_json(id: &str, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{}@example.com", username),
        "role": "user",
    })
}

pub fn error_json(status: u16, message: &str) -> Value {
    json!({ "error": message, "status": status })
}
