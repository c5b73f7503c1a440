/**
 * Post Record
 *
 * The stored form of a post and its projections onto the wire types.
 * Authors are resolved separately and passed in as an `AuthorMap`.
 */
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::backend::auth::users::AuthorMap;
use crate::shared::comment::CommentThread;
use crate::shared::post::{Category, PostDetail, PostEdit, PostSummary};
use crate::shared::user::AuthorSummary;

#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub views: i64,
    /// Users who liked the post, in like order, without duplicates
    pub likes: Vec<Uuid>,
    pub is_published: bool,
    pub is_pinned: bool,
    pub is_locked: bool,
    /// Oldest edit first
    pub edit_history: Vec<PostEdit>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostRecord {
    pub fn likes_count(&self) -> usize {
        self.likes.len()
    }

    pub fn liked_by(&self, user: Uuid) -> bool {
        self.likes.contains(&user)
    }

    /// Listing projection; `viewer` fills in the `liked` flag
    pub fn summary(&self, authors: &AuthorMap, viewer: Option<Uuid>) -> PostSummary {
        self.project(authors.get(&self.author_id).cloned(), viewer)
    }

    /// Detail projection with the author's email, edit history and comment threads
    pub fn detail(
        &self,
        author: Option<AuthorSummary>,
        viewer: Option<Uuid>,
        comments: Vec<CommentThread>,
    ) -> PostDetail {
        PostDetail {
            post: self.project(author, viewer),
            edit_history: self.edit_history.clone(),
            comments,
        }
    }

    fn project(&self, author: Option<AuthorSummary>, viewer: Option<Uuid>) -> PostSummary {
        PostSummary {
            id: self.id,
            title: self.title.clone(),
            content: self.content.clone(),
            author,
            category: self.category,
            tags: self.tags.clone(),
            views: self.views,
            likes: self.likes.clone(),
            likes_count: self.likes_count(),
            is_published: self.is_published,
            is_pinned: self.is_pinned,
            is_locked: self.is_locked,
            created_at: self.created_at,
            updated_at: self.updated_at,
            liked: viewer.map(|user| self.liked_by(user)),
        }
    }
}
