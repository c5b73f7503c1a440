/**
 * Comment Service
 *
 * Comment operations on top of `ForumStore`: thread assembly, reply
 * attachment, edit history and the soft/hard delete rules.
 *
 * # Threading
 *
 * Threads are one level deep. A reply to a reply is attached to the thread
 * root so it stays visible under the root comment.
 *
 * # Deletion
 *
 * A comment with live replies is soft-deleted: its content becomes
 * `[deleted]` and it keeps its id and replies, but it drops out of the
 * post's comment list. Without live replies it is removed. The store makes
 * that decision atomically with respect to new replies.
 */
use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::backend::auth::users::{load_authors, AuthorMap, User};
use crate::backend::comments::model::{author_ids, build_threads};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::permissions::ensure_owner_or_admin;
use crate::backend::store::{CommentRemoval, ForumStore, LikeToggle, NewComment};
use crate::shared::comment::{
    CommentEdit, CommentListResponse, CommentThread, CommentView, CreateCommentRequest,
    MyCommentsResponse, PostRef, UpdateCommentRequest,
};
use crate::shared::pagination::{PageRequest, Pagination};
use crate::shared::validation::check;

const COMMENT_NOT_FOUND: &str = "Comment not found";

/// Live root comments of a post (newest first) with their live replies (oldest first)
///
/// `page = None` loads every root. Returns the threads and the root total.
pub async fn load_threads(
    store: &dyn ForumStore,
    post_id: Uuid,
    page: Option<PageRequest>,
) -> BackendResult<(Vec<CommentThread>, u64)> {
    let (roots, total) = store.list_root_comments(post_id, page).await?;
    if roots.is_empty() {
        return Ok((Vec::new(), total));
    }

    let root_ids: Vec<Uuid> = roots.iter().map(|c| c.id).collect();
    let replies = store.live_replies(&root_ids).await?;
    let authors = load_authors(store, &author_ids(roots.iter().chain(replies.iter()))).await?;

    Ok((build_threads(&roots, &replies, &authors), total))
}

pub async fn list_for_post(
    store: &dyn ForumStore,
    post_id: Uuid,
    page: PageRequest,
) -> BackendResult<CommentListResponse> {
    let (comments, total) = load_threads(store, post_id, Some(page)).await?;
    Ok(CommentListResponse {
        comments,
        pagination: Pagination::new(total, page),
    })
}

/// Create a root comment or a reply
///
/// # Errors
///
/// * `400` - Validation failure, or a parent that is missing or on another post
/// * `403` - The post is locked
/// * `404` - The post does not exist
pub async fn create_comment(
    store: &dyn ForumStore,
    user: &User,
    post_id: Uuid,
    request: CreateCommentRequest,
) -> BackendResult<CommentView> {
    let request = request.normalized();
    check(&request)?;
    let parent_id = request.parent_id()?;

    let post = store
        .find_post(post_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Post not found"))?;
    if post.is_locked {
        tracing::warn!("User {} tried to comment on locked post {}", user.id, post.id);
        return Err(BackendError::forbidden("Cannot comment on a locked post"));
    }

    let parent_id = match parent_id {
        None => None,
        Some(id) => {
            let parent = store
                .find_comment(id)
                .await?
                .filter(|parent| parent.post_id == post_id)
                .ok_or_else(|| BackendError::bad_request("Invalid parent comment"))?;
            Some(parent.parent_id.unwrap_or(parent.id))
        }
    };

    let comment = store
        .create_comment(NewComment {
            post_id,
            author_id: user.id,
            parent_id,
            content: request.content,
        })
        .await?
        .ok_or_else(|| BackendError::bad_request("Invalid parent comment"))?;

    tracing::info!("Comment {} created on post {} by {}", comment.id, post_id, user.id);
    Ok(comment.view(&own_author(user)))
}

/// The caller's live comments, newest first, with the title of each post
pub async fn my_comments(
    store: &dyn ForumStore,
    user: &User,
    page: PageRequest,
) -> BackendResult<MyCommentsResponse> {
    let (comments, total) = store.list_comments_by_author(user.id, page).await?;

    let mut post_ids: Vec<Uuid> = comments.iter().map(|c| c.post_id).collect();
    post_ids.sort_unstable();
    post_ids.dedup();
    let titles: HashMap<Uuid, String> = if post_ids.is_empty() {
        HashMap::new()
    } else {
        store
            .find_posts(&post_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p.title))
            .collect()
    };

    let comments = comments
        .iter()
        .map(|c| {
            let post = titles.get(&c.post_id).map(|title| PostRef {
                id: c.post_id,
                title: title.clone(),
            });
            c.mine(post)
        })
        .collect();

    Ok(MyCommentsResponse {
        comments,
        pagination: Pagination::new(total, page),
    })
}

/// Edit a comment; history is only recorded when the content actually changes
pub async fn update_comment(
    store: &dyn ForumStore,
    user: &User,
    id: Uuid,
    request: UpdateCommentRequest,
) -> BackendResult<CommentView> {
    let existing = ensure_owner_or_admin(user, store.find_comment(id).await?, COMMENT_NOT_FOUND)?;
    let request = request.normalized();
    check(&request)?;

    let updated = if request.content == existing.content {
        existing
    } else {
        let edit = CommentEdit {
            edited_at: Utc::now(),
            previous_content: existing.content.clone(),
        };
        store
            .update_comment(id, &request.content, edit)
            .await?
            .ok_or_else(|| BackendError::not_found(COMMENT_NOT_FOUND))?
    };

    tracing::info!("Comment {} updated by {}", id, user.id);
    let authors = load_authors(store, &[updated.author_id]).await?;
    Ok(updated.view(&authors))
}

/// Delete a comment, softly when it still has live replies
pub async fn delete_comment(store: &dyn ForumStore, user: &User, id: Uuid) -> BackendResult<()> {
    ensure_owner_or_admin(user, store.find_comment(id).await?, COMMENT_NOT_FOUND)?;

    match store.remove_comment(id).await? {
        Some(CommentRemoval::SoftDeleted) => {
            tracing::info!("Comment {} soft-deleted by {}", id, user.id);
        }
        Some(CommentRemoval::Deleted) => {
            tracing::info!("Comment {} deleted by {}", id, user.id);
        }
        None => return Err(BackendError::not_found(COMMENT_NOT_FOUND)),
    }
    Ok(())
}

pub async fn toggle_like(store: &dyn ForumStore, user: &User, id: Uuid) -> BackendResult<LikeToggle> {
    let toggle = store
        .toggle_comment_like(id, user.id)
        .await?
        .ok_or_else(|| BackendError::not_found(COMMENT_NOT_FOUND))?;
    tracing::debug!("Comment {} like by {}: {}", id, user.id, toggle.liked);
    Ok(toggle)
}

fn own_author(user: &User) -> AuthorMap {
    AuthorMap::from([(user.id, user.author())])
}
