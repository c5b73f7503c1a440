//! PostgreSQL Store
//!
//! `ForumStore` backed by a `sqlx::PgPool`. Queries are runtime-checked
//! (`sqlx::query_as::<_, Row>`) and live as free functions taking `&PgPool`
//! in the per-table submodules; `PgStore` only wires them to the trait.
//!
//! Like sets and edit histories are stored in side tables
//! (`post_likes`, `post_edits`, `comment_likes`, `comment_edits`) and
//! folded back into the records on read.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::auth::users::User;
use crate::backend::comments::model::CommentRecord;
use crate::backend::posts::model::PostRecord;
use crate::backend::store::{
    CommentRemoval, ForumStore, LikeToggle, NewComment, NewPost, NewUser, PostChanges, PostFilter, PostFlag,
    ProfileChanges, StoreError, StoreResult,
};
use crate::shared::comment::CommentEdit;
use crate::shared::pagination::{PageRequest, PostSort};
use crate::shared::user::Role;

pub mod comments;
pub mod posts;
pub mod users;

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and run pending migrations
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        tracing::info!("Database connection pool created successfully");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Database(e.into()))?;
        tracing::info!("Database migrations completed successfully");

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Map a unique-constraint violation on `users` to `StoreError::Duplicate`
pub(crate) fn map_unique(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            let field = match db.constraint() {
                Some(name) if name.contains("email") => "email",
                _ => "username",
            };
            return StoreError::Duplicate { field };
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl ForumStore for PgStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        users::create_user(&self.pool, user).await
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        users::get_user_by_id(&self.pool, id).await
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        users::get_user_by_email(&self.pool, email).await
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        users::get_user_by_username(&self.pool, username).await
    }

    async fn find_users(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        users::get_users_by_ids(&self.pool, ids).await
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> StoreResult<bool> {
        users::update_password(&self.pool, id, password_hash).await
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> StoreResult<Option<User>> {
        users::update_profile(&self.pool, id, changes).await
    }

    async fn set_user_role(&self, id: Uuid, role: Role) -> StoreResult<Option<User>> {
        users::set_role(&self.pool, id, role).await
    }

    async fn set_user_active(&self, id: Uuid, active: bool) -> StoreResult<Option<User>> {
        users::set_active(&self.pool, id, active).await
    }

    async fn create_post(&self, post: NewPost) -> StoreResult<PostRecord> {
        posts::create_post(&self.pool, post).await
    }

    async fn find_post(&self, id: Uuid) -> StoreResult<Option<PostRecord>> {
        posts::get_post(&self.pool, id).await
    }

    async fn find_posts(&self, ids: &[Uuid]) -> StoreResult<Vec<PostRecord>> {
        posts::get_posts_by_ids(&self.pool, ids).await
    }

    async fn record_view(&self, id: Uuid) -> StoreResult<Option<PostRecord>> {
        posts::increment_views(&self.pool, id).await
    }

    async fn list_posts(
        &self,
        filter: &PostFilter,
        sort: PostSort,
        page: PageRequest,
    ) -> StoreResult<(Vec<PostRecord>, u64)> {
        posts::list_posts(&self.pool, filter, sort, page).await
    }

    async fn update_post(&self, id: Uuid, changes: PostChanges) -> StoreResult<Option<PostRecord>> {
        posts::update_post(&self.pool, id, changes).await
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<bool> {
        posts::delete_post(&self.pool, id).await
    }

    async fn toggle_post_like(&self, id: Uuid, user: Uuid) -> StoreResult<Option<LikeToggle>> {
        posts::toggle_like(&self.pool, id, user).await
    }

    async fn toggle_post_flag(&self, id: Uuid, flag: PostFlag) -> StoreResult<Option<bool>> {
        posts::toggle_flag(&self.pool, id, flag).await
    }

    async fn create_comment(&self, comment: NewComment) -> StoreResult<Option<CommentRecord>> {
        comments::create_comment(&self.pool, comment).await
    }

    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<CommentRecord>> {
        comments::get_comment(&self.pool, id).await
    }

    async fn list_root_comments(
        &self,
        post: Uuid,
        page: Option<PageRequest>,
    ) -> StoreResult<(Vec<CommentRecord>, u64)> {
        comments::list_roots(&self.pool, post, page).await
    }

    async fn live_replies(&self, parents: &[Uuid]) -> StoreResult<Vec<CommentRecord>> {
        comments::live_replies(&self.pool, parents).await
    }

    async fn list_comments_by_author(
        &self,
        author: Uuid,
        page: PageRequest,
    ) -> StoreResult<(Vec<CommentRecord>, u64)> {
        comments::list_by_author(&self.pool, author, page).await
    }

    async fn update_comment(
        &self,
        id: Uuid,
        content: &str,
        edit: CommentEdit,
    ) -> StoreResult<Option<CommentRecord>> {
        comments::update_content(&self.pool, id, content, edit).await
    }

    async fn remove_comment(&self, id: Uuid) -> StoreResult<Option<CommentRemoval>> {
        comments::remove(&self.pool, id).await
    }

    async fn toggle_comment_like(&self, id: Uuid, user: Uuid) -> StoreResult<Option<LikeToggle>> {
        comments::toggle_like(&self.pool, id, user).await
    }
}
