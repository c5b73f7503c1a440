//! Storage Module
//!
//! Persistence for users, posts and comments behind the [`ForumStore`] trait.
//! Handlers and services only ever see `Arc<dyn ForumStore>`, so the same
//! code runs against PostgreSQL in production and the in-memory store in
//! tests or when no database is configured.
//!
//! # Module Structure
//!
//! ```text
//! store/
//! ├── mod.rs          - Trait, input/filter types, StoreError
//! ├── memory.rs       - MemoryStore (tokio RwLock over HashMaps)
//! └── postgres/       - PgStore (sqlx)
//!     ├── users.rs
//!     ├── posts.rs
//!     └── comments.rs
//! ```
//!
//! # Consistency
//!
//! Every method is a single logical operation: like toggles, view
//! increments and flag toggles are atomic with respect to concurrent
//! requests, and deleting a post removes its comments in the same step.
//! Removing a comment decides between soft and hard delete under the same
//! lock that reply creation takes on the parent, so a reply is never lost
//! to a concurrent delete of its root.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::backend::auth::users::User;
use crate::backend::comments::model::CommentRecord;
use crate::backend::posts::model::PostRecord;
use crate::shared::comment::CommentEdit;
use crate::shared::pagination::{PageRequest, PostListParams, PostSort};
use crate::shared::post::{Category, PostEdit};
use crate::shared::user::Role;

/// In-memory implementation
pub mod memory;

/// PostgreSQL implementation
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique column already holds this value
    #[error("{field} is already in use")]
    Duplicate {
        /// `username` or `email`
        field: &'static str,
    },

    /// Underlying database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored value could not be mapped back into a domain type
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Fields of a new account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Profile fields to overwrite; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub category: Category,
    pub tags: Vec<String>,
}

/// Post fields to overwrite, plus the history entry to append if the body changed
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<Category>,
    pub tags: Option<Vec<String>>,
    pub edit: Option<PostEdit>,
}

/// Post listing filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostFilter {
    pub published_only: bool,
    pub category: Option<Category>,
    pub author: Option<Uuid>,
    /// Lowercased search terms; a post matches if any term appears in its
    /// title, content or one of its tags
    pub terms: Vec<String>,
}

impl PostFilter {
    /// Every post of one author, published or not
    pub fn by_author(author: Uuid) -> Self {
        Self {
            author: Some(author),
            ..Default::default()
        }
    }
}

impl From<&PostListParams> for PostFilter {
    fn from(params: &PostListParams) -> Self {
        Self {
            published_only: true,
            category: params.category,
            author: params.author,
            terms: params
                .search
                .as_deref()
                .map(|s| s.split_whitespace().map(str::to_lowercase).collect())
                .unwrap_or_default(),
        }
    }
}

/// Boolean moderation flags on a post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFlag {
    Pinned,
    Locked,
}

/// Outcome of a like toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeToggle {
    /// Whether the user likes the target after the toggle
    pub liked: bool,
    pub likes_count: usize,
}

/// How [`ForumStore::remove_comment`] disposed of a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentRemoval {
    /// Row removed
    Deleted,
    /// Live replies exist; content replaced with the placeholder
    SoftDeleted,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: Uuid,
    pub author_id: Uuid,
    /// Already resolved to the thread root
    pub parent_id: Option<Uuid>,
    pub content: String,
}

/// Forum persistence
///
/// Lookups return `Ok(None)` (or `false`) when the target does not exist;
/// errors are reserved for storage failures and uniqueness violations.
#[async_trait]
pub trait ForumStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    async fn find_users(&self, ids: &[Uuid]) -> StoreResult<Vec<User>>;
    async fn update_password(&self, id: Uuid, password_hash: &str) -> StoreResult<bool>;
    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> StoreResult<Option<User>>;
    async fn set_user_role(&self, id: Uuid, role: Role) -> StoreResult<Option<User>>;
    async fn set_user_active(&self, id: Uuid, active: bool) -> StoreResult<Option<User>>;

    async fn create_post(&self, post: NewPost) -> StoreResult<PostRecord>;
    async fn find_post(&self, id: Uuid) -> StoreResult<Option<PostRecord>>;
    async fn find_posts(&self, ids: &[Uuid]) -> StoreResult<Vec<PostRecord>>;
    /// Increment the view counter by one and return the updated post
    async fn record_view(&self, id: Uuid) -> StoreResult<Option<PostRecord>>;
    /// One page of matching posts plus the total match count
    async fn list_posts(
        &self,
        filter: &PostFilter,
        sort: PostSort,
        page: PageRequest,
    ) -> StoreResult<(Vec<PostRecord>, u64)>;
    async fn update_post(&self, id: Uuid, changes: PostChanges) -> StoreResult<Option<PostRecord>>;
    /// Delete a post together with all of its comments
    async fn delete_post(&self, id: Uuid) -> StoreResult<bool>;
    async fn toggle_post_like(&self, id: Uuid, user: Uuid) -> StoreResult<Option<LikeToggle>>;
    /// Flip a flag and return its new value
    async fn toggle_post_flag(&self, id: Uuid, flag: PostFlag) -> StoreResult<Option<bool>>;

    /// Insert a comment. Returns `None` when `parent_id` names a comment that
    /// no longer exists.
    async fn create_comment(&self, comment: NewComment) -> StoreResult<Option<CommentRecord>>;
    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<CommentRecord>>;
    /// Live root comments of a post, newest first, and their count.
    /// `None` returns every root.
    async fn list_root_comments(
        &self,
        post: Uuid,
        page: Option<PageRequest>,
    ) -> StoreResult<(Vec<CommentRecord>, u64)>;
    /// Live replies of the given parents, oldest first
    async fn live_replies(&self, parents: &[Uuid]) -> StoreResult<Vec<CommentRecord>>;
    /// Live comments of one author, newest first
    async fn list_comments_by_author(
        &self,
        author: Uuid,
        page: PageRequest,
    ) -> StoreResult<(Vec<CommentRecord>, u64)>;
    async fn update_comment(
        &self,
        id: Uuid,
        content: &str,
        edit: CommentEdit,
    ) -> StoreResult<Option<CommentRecord>>;
    /// Soft-delete the comment if it has live replies, otherwise remove it.
    /// The reply check and the write are one atomic step.
    async fn remove_comment(&self, id: Uuid) -> StoreResult<Option<CommentRemoval>>;
    async fn toggle_comment_like(&self, id: Uuid, user: Uuid) -> StoreResult<Option<LikeToggle>>;
}
