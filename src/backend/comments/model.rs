/**
 * Comment Record
 *
 * The stored form of a comment, its wire projections, and thread assembly.
 */
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::backend::auth::users::AuthorMap;
use crate::shared::comment::{CommentEdit, CommentThread, CommentView, MyCommentView, PostRef};

#[derive(Debug, Clone, PartialEq)]
pub struct CommentRecord {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    /// Thread root this comment replies to
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub likes: Vec<Uuid>,
    pub is_edited: bool,
    /// Oldest edit first
    pub edit_history: Vec<CommentEdit>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommentRecord {
    pub fn likes_count(&self) -> usize {
        self.likes.len()
    }

    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    pub fn view(&self, authors: &AuthorMap) -> CommentView {
        CommentView {
            id: self.id,
            content: self.content.clone(),
            author: authors.get(&self.author_id).cloned(),
            post: self.post_id,
            parent_comment: self.parent_id,
            likes: self.likes.clone(),
            likes_count: self.likes_count(),
            is_edited: self.is_edited,
            is_deleted: self.is_deleted,
            edit_history: self.edit_history.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Entry of the caller's own comment list
    pub fn mine(&self, post: Option<PostRef>) -> MyCommentView {
        MyCommentView {
            id: self.id,
            content: self.content.clone(),
            post,
            parent_comment: self.parent_id,
            likes_count: self.likes_count(),
            is_edited: self.is_edited,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Attach replies to their roots, preserving the order of both slices
pub fn build_threads(
    roots: &[CommentRecord],
    replies: &[CommentRecord],
    authors: &AuthorMap,
) -> Vec<CommentThread> {
    let mut by_parent: HashMap<Uuid, Vec<CommentView>> = HashMap::new();
    for reply in replies {
        if let Some(parent) = reply.parent_id {
            by_parent.entry(parent).or_default().push(reply.view(authors));
        }
    }

    roots
        .iter()
        .map(|root| CommentThread {
            comment: root.view(authors),
            replies: by_parent.remove(&root.id).unwrap_or_default(),
        })
        .collect()
}

/// Every author id referenced by the given comments, deduplicated
pub fn author_ids<'a>(comments: impl IntoIterator<Item = &'a CommentRecord>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = comments.into_iter().map(|c| c.author_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
