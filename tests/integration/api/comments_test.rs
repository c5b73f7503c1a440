//! Comments API integration tests
//!
//! Covers threading, locked posts, edit history and the soft/hard delete
//! rules.

use axum::http::StatusCode;
use forum::shared::comment::{
    CommentEnvelope, CommentListResponse, MyCommentsResponse, DELETED_PLACEHOLDER,
};
use forum::backend::store::ForumStore;
use forum::shared::post::{LikeResponse, PostDetail};
use forum::shared::user::Role;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::{assert_error, assert_validation_error, TestApp, TestUser};

async fn threads(app: &TestApp, post: Uuid) -> CommentListResponse {
    let response = app.server.get(&format!("/api/comments/post/{}", post)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json()
}

async fn delete(app: &TestApp, user: &TestUser, comment: Uuid) -> axum_test::TestResponse {
    app.server
        .delete(&format!("/api/comments/{}", comment))
        .authorization_bearer(&user.token)
        .await
}

#[tokio::test]
async fn test_create_comment() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let post = app.create_post(&alice, "Discuss").await;

    let response = app
        .server
        .post(&format!("/api/comments/post/{}", post))
        .authorization_bearer(&alice.token)
        .json(&json!({ "content": "  Great point  " }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: CommentEnvelope = response.json();
    assert_eq!(body.message, "Comment created");
    assert_eq!(body.comment.content, "Great point");
    assert_eq!(body.comment.post, post);
    assert_eq!(body.comment.parent_comment, None);
    assert_eq!(body.comment.author.as_ref().map(|a| a.id), Some(alice.id));
    assert!(!body.comment.is_edited);
    assert!(!body.comment.is_deleted);
}

#[tokio::test]
async fn test_create_comment_errors() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let post = app.create_post(&alice, "Discuss").await;

    let response = app
        .server
        .post(&format!("/api/comments/post/{}", post))
        .json(&json!({ "content": "anonymous" }))
        .await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "Authentication required");

    let response = app
        .server
        .post(&format!("/api/comments/post/{}", post))
        .authorization_bearer(&alice.token)
        .json(&json!({ "content": "x".repeat(1001) }))
        .await;
    assert_validation_error(&response, "content");

    let response = app
        .server
        .post(&format!("/api/comments/post/{}", Uuid::new_v4()))
        .authorization_bearer(&alice.token)
        .json(&json!({ "content": "hello" }))
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, "Post not found");

    let response = app
        .server
        .post(&format!("/api/comments/post/{}", post))
        .authorization_bearer(&alice.token)
        .json(&json!({ "content": "hello", "parentComment": "nope" }))
        .await;
    assert_validation_error(&response, "parentComment");
}

#[tokio::test]
async fn test_parent_must_belong_to_the_post() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let first = app.create_post(&alice, "First").await;
    let second = app.create_post(&alice, "Second").await;
    let elsewhere = app.comment(&alice, first, "On the first post", None).await;

    for parent in [elsewhere, Uuid::new_v4()] {
        let response = app
            .server
            .post(&format!("/api/comments/post/{}", second))
            .authorization_bearer(&alice.token)
            .json(&json!({ "content": "reply", "parentComment": parent.to_string() }))
            .await;
        assert_error(&response, StatusCode::BAD_REQUEST, "Invalid parent comment");
    }
}

#[tokio::test]
async fn test_locked_post_rejects_comments() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let moderator = app.register_with_role("mod", Role::Moderator).await;
    let post = app.create_post(&alice, "Heated").await;

    app.server
        .post(&format!("/api/posts/{}/lock", post))
        .authorization_bearer(&moderator.token)
        .await;

    let response = app
        .server
        .post(&format!("/api/comments/post/{}", post))
        .authorization_bearer(&alice.token)
        .json(&json!({ "content": "one more thing" }))
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, "Cannot comment on a locked post");
}

#[tokio::test]
async fn test_threads_are_one_level_deep() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let post = app.create_post(&alice, "Threads").await;

    let root = app.comment(&alice, post, "Root", None).await;
    let reply = app.comment(&bob, post, "Reply", Some(root)).await;
    let nested = app.comment(&alice, post, "Reply to reply", Some(reply)).await;
    let newer_root = app.comment(&bob, post, "Second root", None).await;

    let list = threads(&app, post).await;
    assert_eq!(list.pagination.total, 2);

    // roots newest first, replies oldest first
    assert_eq!(list.comments[0].comment.id, newer_root);
    assert_eq!(list.comments[1].comment.id, root);
    let replies: Vec<Uuid> = list.comments[1].replies.iter().map(|r| r.id).collect();
    assert_eq!(replies, vec![reply, nested]);
    assert_eq!(list.comments[1].replies[1].parent_comment, Some(root));
}

#[tokio::test]
async fn test_list_comments_paginates_roots() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let post = app.create_post(&alice, "Busy thread").await;
    for i in 0..3 {
        app.comment(&alice, post, &format!("Comment {}", i), None).await;
    }

    let response = app
        .server
        .get(&format!("/api/comments/post/{}", post))
        .add_query_param("limit", "2")
        .add_query_param("page", "2")
        .await;
    let list: CommentListResponse = response.json();
    assert_eq!(list.comments.len(), 1);
    assert_eq!(list.comments[0].comment.content, "Comment 0");
    assert_eq!(list.pagination.total, 3);
    assert_eq!(list.pagination.pages, 2);

    let response = app
        .server
        .get(&format!("/api/comments/post/{}", post))
        .add_query_param("limit", "0")
        .await;
    assert_validation_error(&response, "limit");
}

#[tokio::test]
async fn test_list_comments_for_unknown_post_is_empty() {
    let app = TestApp::new();

    let list = threads(&app, Uuid::new_v4()).await;
    assert!(list.comments.is_empty());
    assert_eq!(list.pagination.total, 0);
}

#[tokio::test]
async fn test_update_comment_history() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let post = app.create_post(&alice, "Edits").await;
    let comment = app.comment(&alice, post, "Frist", None).await;

    let response = app
        .server
        .put(&format!("/api/comments/{}", comment))
        .authorization_bearer(&alice.token)
        .json(&json!({ "content": "First" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: CommentEnvelope = response.json();
    assert_eq!(body.message, "Comment updated");
    assert_eq!(body.comment.content, "First");
    assert!(body.comment.is_edited);
    assert_eq!(body.comment.edit_history.len(), 1);
    assert_eq!(body.comment.edit_history[0].previous_content, "Frist");

    // unchanged content records nothing
    let body: CommentEnvelope = app
        .server
        .put(&format!("/api/comments/{}", comment))
        .authorization_bearer(&alice.token)
        .json(&json!({ "content": " First " }))
        .await
        .json();
    assert_eq!(body.comment.edit_history.len(), 1);
}

#[tokio::test]
async fn test_update_comment_permissions() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let admin = app.register_with_role("admin", Role::Admin).await;
    let post = app.create_post(&alice, "Edits").await;
    let comment = app.comment(&alice, post, "Mine", None).await;

    let response = app
        .server
        .put(&format!("/api/comments/{}", comment))
        .authorization_bearer(&bob.token)
        .json(&json!({ "content": "Not yours" }))
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, "Permission denied");

    let response = app
        .server
        .put(&format!("/api/comments/{}", Uuid::new_v4()))
        .authorization_bearer(&bob.token)
        .json(&json!({ "content": "Ghost" }))
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, "Comment not found");

    let response = app
        .server
        .put(&format!("/api/comments/{}", comment))
        .authorization_bearer(&admin.token)
        .json(&json!({ "content": "Moderated" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_delete_without_replies_removes_comment() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let post = app.create_post(&alice, "Cleanup").await;
    let comment = app.comment(&alice, post, "Oops", None).await;

    let response = delete(&app, &alice, comment).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Comment deleted");

    assert!(threads(&app, post).await.comments.is_empty());
    let response = delete(&app, &alice, comment).await;
    assert_error(&response, StatusCode::NOT_FOUND, "Comment not found");
}

#[tokio::test]
async fn test_delete_with_replies_is_soft_and_hidden() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let post = app.create_post(&alice, "Soft delete").await;
    let kept = app.comment(&bob, post, "Still here", None).await;
    let root = app.comment(&alice, post, "Root", None).await;
    let reply = app.comment(&bob, post, "Reply", Some(root)).await;

    let response = delete(&app, &alice, root).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let list = threads(&app, post).await;
    assert_eq!(list.pagination.total, 1);
    assert_eq!(list.comments.len(), 1);
    assert_eq!(list.comments[0].comment.id, kept);

    let detail: PostDetail = app.server.get(&format!("/api/posts/{}", post)).await.json();
    assert_eq!(detail.comments.len(), 1);
    assert_eq!(detail.comments[0].comment.id, kept);

    let stored = app.store.find_comment(root).await.unwrap().unwrap();
    assert_eq!(stored.content, DELETED_PLACEHOLDER);
    assert!(stored.is_deleted);
    assert!(app.store.find_comment(reply).await.unwrap().is_some());

    // a soft-deleted comment can still be liked and edited
    let response = app
        .server
        .post(&format!("/api/comments/{}/like", root))
        .authorization_bearer(&bob.token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let response = app
        .server
        .put(&format!("/api/comments/{}", root))
        .authorization_bearer(&alice.token)
        .json(&json!({ "content": "Back again" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // deleting the reply leaves the soft-deleted root in place
    assert_eq!(delete(&app, &bob, reply).await.status_code(), StatusCode::OK);
    assert!(app.store.find_comment(reply).await.unwrap().is_none());
    assert!(app.store.find_comment(root).await.unwrap().is_some());

    // with no live replies left, a second delete removes it
    assert_eq!(delete(&app, &alice, root).await.status_code(), StatusCode::OK);
    assert!(app.store.find_comment(root).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_comment_permissions() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let admin = app.register_with_role("admin", Role::Admin).await;
    let post = app.create_post(&alice, "Guarded").await;
    let comment = app.comment(&alice, post, "Keep out", None).await;

    let response = delete(&app, &bob, comment).await;
    assert_error(&response, StatusCode::FORBIDDEN, "Permission denied");

    assert_eq!(delete(&app, &admin, comment).await.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_like_comment_toggle() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let post = app.create_post(&alice, "Likes").await;
    let comment = app.comment(&alice, post, "Like this", None).await;

    let liked: LikeResponse = app
        .server
        .post(&format!("/api/comments/{}/like", comment))
        .authorization_bearer(&bob.token)
        .await
        .json();
    assert_eq!(liked.message, "Comment liked");
    assert!(liked.liked);
    assert_eq!(liked.likes_count, 1);

    let unliked: LikeResponse = app
        .server
        .post(&format!("/api/comments/{}/like", comment))
        .authorization_bearer(&bob.token)
        .await
        .json();
    assert_eq!(unliked.message, "Like removed");
    assert_eq!(unliked.likes_count, 0);
}

#[tokio::test]
async fn test_my_comments() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let post = app.create_post(&alice, "Where it was said").await;
    let root = app.comment(&bob, post, "Bob's root", None).await;
    app.comment(&alice, post, "Alice's reply", Some(root)).await;

    let response = app
        .server
        .get("/api/comments/my-comments")
        .authorization_bearer(&bob.token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let mine: MyCommentsResponse = response.json();
    assert_eq!(mine.pagination.total, 1);
    assert_eq!(mine.comments[0].id, root);
    let post_ref = mine.comments[0].post.as_ref().expect("post reference");
    assert_eq!(post_ref.id, post);
    assert_eq!(post_ref.title, "Where it was said");

    let response = app.server.get("/api/comments/my-comments").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}
