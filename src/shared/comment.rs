/**
 * Comment Payloads
 *
 * Wire types for the comments API. Threads are one level deep: a
 * `CommentThread` is a root comment plus its live replies.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::shared::error::SharedError;
use crate::shared::pagination::Pagination;
use crate::shared::user::AuthorSummary;
use crate::shared::validation::{object_id, trim_in_place};

/// Longest allowed comment, in characters
pub const COMMENT_MAX_CHARS: u64 = 1000;

/// Content shown in place of a soft-deleted comment
pub const DELETED_PLACEHOLDER: &str = "[deleted]";

/// One entry of a comment's edit history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentEdit {
    pub edited_at: DateTime<Utc>,
    pub previous_content: String,
}

/// A single comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub content: String,
    pub author: Option<AuthorSummary>,
    pub post: Uuid,
    pub parent_comment: Option<Uuid>,
    pub likes: Vec<Uuid>,
    pub likes_count: usize,
    pub is_edited: bool,
    pub is_deleted: bool,
    pub edit_history: Vec<CommentEdit>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A root comment with its replies, oldest reply first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentThread {
    #[serde(flatten)]
    pub comment: CommentView,
    pub replies: Vec<CommentView>,
}

/// Minimal post reference attached to the caller's own comments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRef {
    pub id: Uuid,
    pub title: String,
}

/// Entry of `GET /api/comments/my-comments`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyCommentView {
    pub id: Uuid,
    pub content: String,
    /// `None` if the post could not be resolved
    pub post: Option<PostRef>,
    pub parent_comment: Option<Uuid>,
    pub likes_count: usize,
    pub is_edited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create comment request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 1000, message = "Comment is required and may be at most 1000 characters"))]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "object_id"))]
    pub parent_comment: Option<String>,
}

impl CreateCommentRequest {
    pub fn normalized(mut self) -> Self {
        trim_in_place(&mut self.content);
        self
    }

    /// Parsed parent id; call after validation
    pub fn parent_id(&self) -> Result<Option<Uuid>, SharedError> {
        self.parent_comment
            .as_deref()
            .map(|raw| Uuid::parse_str(raw).map_err(|_| SharedError::invalid_id("parentComment", raw)))
            .transpose()
    }
}

/// Update comment request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 1000, message = "Comment is required and may be at most 1000 characters"))]
    pub content: String,
}

impl UpdateCommentRequest {
    pub fn normalized(mut self) -> Self {
        trim_in_place(&mut self.content);
        self
    }
}

/// `GET /api/comments/post/{postId}` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentListResponse {
    pub comments: Vec<CommentThread>,
    pub pagination: Pagination,
}

/// `GET /api/comments/my-comments` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MyCommentsResponse {
    pub comments: Vec<MyCommentView>,
    pub pagination: Pagination,
}

/// Create/update response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentEnvelope {
    pub message: String,
    pub comment: CommentView,
}
