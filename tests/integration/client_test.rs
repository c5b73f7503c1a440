//! ForumClient tests against a wiremock server

use forum::client::ClientError;
use forum::shared::comment::CreateCommentRequest;
use forum::shared::pagination::{ListQuery, SortField, SortOrder};
use forum::shared::post::{Category, CreatePostRequest};
use forum::shared::user::{LoginRequest, RegisterRequest};
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common::mock_server::{error_json, mock_forum, user_json};

#[tokio::test]
async fn test_login_sends_credentials() {
    let (server, client) = mock_forum().await;
    let id = Uuid::new_v4().to_string();

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_partial_json(json!({ "email": "fan@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Login successful",
            "user": user_json(&id, "fan"),
            "token": "jwt-token",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let auth = client
        .login(&LoginRequest {
            email: "fan@example.com".to_string(),
            password: "Secret123".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(auth.token, "jwt-token");
    assert_eq!(auth.user.username, "fan");
}

#[tokio::test]
async fn test_token_sent_as_bearer() {
    let (server, mut client) = mock_forum().await;
    let id = Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer jwt-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": user_json(&id, "fan") })))
        .expect(1)
        .mount(&server)
        .await;

    client.set_token("jwt-token");
    let me = client.me().await.unwrap();
    assert_eq!(me.user.id.to_string(), id);
}

#[tokio::test]
async fn test_error_body_becomes_api_error() {
    let (server, client) = mock_forum().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_json(401, "Authentication required")))
        .mount(&server)
        .await;

    let err = client.me().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    match err {
        ClientError::Api { message, .. } => assert_eq!(message, "Authentication required"),
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_validation_details_are_kept() {
    let (server, client) = mock_forum().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Validation failed",
            "status": 400,
            "details": [{ "field": "email", "message": "Email is already in use" }],
        })))
        .mount(&server)
        .await;

    let err = client
        .register(&RegisterRequest {
            username: "fan".to_string(),
            email: "fan@example.com".to_string(),
            password: "Secret123".to_string(),
        })
        .await
        .unwrap_err();

    match err {
        ClientError::Api { status, details, .. } => {
            assert_eq!(status, 400);
            assert_eq!(details[0].field, "email");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_requests_are_not_sent() {
    let (server, client) = mock_forum().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let err = client
        .register(&RegisterRequest {
            username: "x".to_string(),
            email: "nope".to_string(),
            password: "weak".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Shared(_)));

    let err = client
        .create_post(&CreatePostRequest {
            title: "Title".to_string(),
            content: "short".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Shared(_)));

    let err = client
        .create_comment(
            Uuid::new_v4(),
            &CreateCommentRequest {
                content: "   ".to_string(),
                parent_comment: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Shared(_)));
}

#[tokio::test]
async fn test_list_posts_sends_query() {
    let (server, client) = mock_forum().await;

    Mock::given(method("GET"))
        .and(path("/api/posts"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "5"))
        .and(query_param("sortBy", "likes"))
        .and(query_param("order", "asc"))
        .and(query_param("category", "tech"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "posts": [],
            "pagination": { "total": 6, "page": 2, "pages": 2, "limit": 5 },
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = ListQuery::default()
        .page(2)
        .limit(5)
        .sort_by(SortField::Likes, SortOrder::Asc)
        .category(Category::Tech);
    let list = client.list_posts(&query).await.unwrap();

    assert!(list.posts.is_empty());
    assert_eq!(list.pagination.total, 6);
}

#[tokio::test]
async fn test_non_json_error_body_kept_verbatim() {
    let (server, client) = mock_forum().await;
    let id = Uuid::new_v4();

    Mock::given(method("DELETE"))
        .and(path(format!("/api/posts/{}", id)))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    match client.delete_post(id).await.unwrap_err() {
        ClientError::Api { status, message, .. } => {
            assert_eq!(status, 502);
            assert_eq!(message, "Bad Gateway");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}
