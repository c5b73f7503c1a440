/**
 * Post Payloads
 *
 * Wire types for the posts API: the category enum, the post views returned
 * by list/detail endpoints, and the create/update request bodies with their
 * validation rules.
 *
 * All JSON is camelCase (`likesCount`, `isPinned`, `editHistory`).
 */
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::shared::comment::CommentThread;
use crate::shared::pagination::Pagination;
use crate::shared::user::AuthorSummary;
use crate::shared::validation::{known_category, tag_lengths, trim_in_place, trim_opt_in_place};

/// Longest allowed post title, in characters
pub const TITLE_MAX_CHARS: u64 = 200;
/// Shortest allowed post body, in characters
pub const CONTENT_MIN_CHARS: u64 = 10;
/// Longest allowed tag, in characters
pub const TAG_MAX_CHARS: usize = 20;

/// Post category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    General,
    Tech,
    Discussion,
    Question,
    Announcement,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::General,
        Category::Tech,
        Category::Discussion,
        Category::Question,
        Category::Announcement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Tech => "tech",
            Category::Discussion => "discussion",
            Category::Question => "question",
            Category::Announcement => "announcement",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// One entry of a post's edit history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostEdit {
    pub edited_at: DateTime<Utc>,
    pub edited_by: Option<Uuid>,
    pub previous_content: String,
}

/// Post as shown in listings (no edit history)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// `None` when the author account no longer resolves
    pub author: Option<AuthorSummary>,
    pub category: Category,
    pub tags: Vec<String>,
    pub views: i64,
    pub likes: Vec<Uuid>,
    pub likes_count: usize,
    pub is_published: bool,
    pub is_pinned: bool,
    pub is_locked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Whether the caller has liked the post; only present for signed-in callers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liked: Option<bool>,
}

/// Full post with edit history and threaded comments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: PostSummary,
    pub edit_history: Vec<PostEdit>,
    pub comments: Vec<CommentThread>,
}

/// Create post request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required and may be at most 200 characters"))]
    pub title: String,
    #[validate(length(min = 10, message = "Content must be at least 10 characters"))]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "known_category"))]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "tag_lengths"))]
    pub tags: Option<Vec<String>>,
}

impl CreatePostRequest {
    /// Trim title, content and tags the way they are stored
    pub fn normalized(mut self) -> Self {
        trim_in_place(&mut self.title);
        trim_in_place(&mut self.content);
        if let Some(tags) = self.tags.as_mut() {
            tags.iter_mut().for_each(trim_in_place);
        }
        self
    }
}

/// Update post request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200, message = "Title is required and may be at most 200 characters"))]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 10, message = "Content must be at least 10 characters"))]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "known_category"))]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "tag_lengths"))]
    pub tags: Option<Vec<String>>,
}

impl UpdatePostRequest {
    pub fn normalized(mut self) -> Self {
        trim_opt_in_place(&mut self.title);
        trim_opt_in_place(&mut self.content);
        if let Some(tags) = self.tags.as_mut() {
            tags.iter_mut().for_each(trim_in_place);
        }
        self
    }
}

/// `GET /api/posts` and `GET /api/posts/my-posts` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostSummary>,
    pub pagination: Pagination,
}

/// Create/update response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostEnvelope {
    pub message: String,
    pub post: PostSummary,
}

/// Like toggle response (posts and comments)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub message: String,
    pub likes_count: usize,
    pub liked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinResponse {
    pub message: String,
    pub is_pinned: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockResponse {
    pub message: String,
    pub is_locked: bool,
}
