//! `PgStore` tests against a real database
//!
//! Every test creates its own users so runs do not interfere with each other.

use chrono::Utc;
use forum::backend::store::{
    CommentRemoval, ForumStore, NewComment, NewPost, NewUser, PgStore, PostChanges, PostFilter, PostFlag,
    StoreError,
};
use forum::shared::comment::{CommentEdit, DELETED_PLACEHOLDER};
use forum::shared::pagination::{PageRequest, PostSort};
use forum::shared::post::{Category, PostEdit};
use forum::shared::user::Role;
use uuid::Uuid;

use crate::common::database::{pg_store, unique_identity};

async fn new_user(store: &PgStore, prefix: &str) -> forum::backend::auth::User {
    let (username, email) = unique_identity(prefix);
    store
        .create_user(NewUser {
            username,
            email,
            password_hash: "not-a-real-hash".to_string(),
            role: Role::User,
        })
        .await
        .expect("create user")
}

async fn new_post(store: &PgStore, author: Uuid, title: &str) -> Uuid {
    store
        .create_post(NewPost {
            author_id: author,
            title: title.to_string(),
            content: "Content stored in PostgreSQL".to_string(),
            category: Category::Tech,
            tags: vec!["db".to_string()],
        })
        .await
        .expect("create post")
        .id
}

#[tokio::test]
#[ignore] // Requires TEST_DATABASE_URL
async fn test_migrations_and_user_round_trip() {
    let store = pg_store().await;
    let user = new_user(&store, "pg").await;

    let found = store.find_user_by_email(&user.email).await.unwrap().unwrap();
    assert_eq!(found.id, user.id);
    assert_eq!(found.role, Role::User);
    assert!(found.is_active);

    let promoted = store.set_user_role(user.id, Role::Moderator).await.unwrap().unwrap();
    assert_eq!(promoted.role, Role::Moderator);

    let inactive = store.set_user_active(user.id, false).await.unwrap().unwrap();
    assert!(!inactive.is_active);
}

#[tokio::test]
#[ignore] // Requires TEST_DATABASE_URL
async fn test_duplicate_username_is_reported() {
    let store = pg_store().await;
    let user = new_user(&store, "dup").await;

    let err = store
        .create_user(NewUser {
            username: user.username.clone(),
            email: format!("other_{}", user.email),
            password_hash: String::new(),
            role: Role::User,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Duplicate { field: "username" }));
}

#[tokio::test]
#[ignore] // Requires TEST_DATABASE_URL
async fn test_post_views_likes_flags_and_history() {
    let store = pg_store().await;
    let user = new_user(&store, "posts").await;
    let post = new_post(&store, user.id, "Stored").await;

    let viewed = store.record_view(post).await.unwrap().unwrap();
    assert_eq!(viewed.views, 1);

    let like = store.toggle_post_like(post, user.id).await.unwrap().unwrap();
    assert!(like.liked);
    assert_eq!(like.likes_count, 1);
    let unlike = store.toggle_post_like(post, user.id).await.unwrap().unwrap();
    assert!(!unlike.liked);

    assert_eq!(store.toggle_post_flag(post, PostFlag::Pinned).await.unwrap(), Some(true));
    assert_eq!(store.toggle_post_flag(post, PostFlag::Pinned).await.unwrap(), Some(false));

    let updated = store
        .update_post(
            post,
            PostChanges {
                content: Some("Rewritten content in PostgreSQL".to_string()),
                edit: Some(PostEdit {
                    edited_at: Utc::now(),
                    edited_by: Some(user.id),
                    previous_content: "Content stored in PostgreSQL".to_string(),
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.edit_history.len(), 1);
    assert_eq!(updated.title, "Stored");

    let (posts, total) = store
        .list_posts(&PostFilter::by_author(user.id), PostSort::newest(), PageRequest::new(1, 10))
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(posts[0].id, post);
}

#[tokio::test]
#[ignore] // Requires TEST_DATABASE_URL
async fn test_comments_soft_delete_and_cascade() {
    let store = pg_store().await;
    let user = new_user(&store, "comments").await;
    let post = new_post(&store, user.id, "Discussed").await;

    let root = store
        .create_comment(NewComment {
            post_id: post,
            author_id: user.id,
            parent_id: None,
            content: "Root".to_string(),
        })
        .await
        .unwrap()
        .unwrap();
    let reply = store
        .create_comment(NewComment {
            post_id: post,
            author_id: user.id,
            parent_id: Some(root.id),
            content: "Reply".to_string(),
        })
        .await
        .unwrap()
        .unwrap();

    let edited = store
        .update_comment(
            reply.id,
            "Edited reply",
            CommentEdit {
                edited_at: Utc::now(),
                previous_content: "Reply".to_string(),
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert!(edited.is_edited);

    assert_eq!(
        store.remove_comment(root.id).await.unwrap(),
        Some(CommentRemoval::SoftDeleted)
    );
    let stored = store.find_comment(root.id).await.unwrap().unwrap();
    assert_eq!(stored.content, DELETED_PLACEHOLDER);
    assert!(stored.is_deleted);
    let (roots, total) = store.list_root_comments(post, None).await.unwrap();
    assert!(roots.is_empty());
    assert_eq!(total, 0);
    assert!(store.find_comment(reply.id).await.unwrap().is_some());

    assert!(store.delete_post(post).await.unwrap());
    assert!(store.find_comment(reply.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires TEST_DATABASE_URL
async fn test_concurrent_reply_survives_root_removal() {
    let store = std::sync::Arc::new(pg_store().await);
    let user = new_user(&store, "race").await;
    let post = new_post(&store, user.id, "Contended").await;

    for _ in 0..20 {
        let root = store
            .create_comment(NewComment {
                post_id: post,
                author_id: user.id,
                parent_id: None,
                content: "Root".to_string(),
            })
            .await
            .unwrap()
            .unwrap();

        let replier = {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .create_comment(NewComment {
                        post_id: post,
                        author_id: user.id,
                        parent_id: Some(root.id),
                        content: "Reply".to_string(),
                    })
                    .await
            })
        };
        let removal = store.remove_comment(root.id).await.unwrap();
        let reply = replier.await.unwrap().unwrap();

        match reply {
            Some(reply) => {
                assert_eq!(removal, Some(CommentRemoval::SoftDeleted));
                assert!(store.find_comment(reply.id).await.unwrap().is_some());
            }
            None => assert_eq!(removal, Some(CommentRemoval::Deleted)),
        }
    }
}
