/**
 * In-Memory Store
 *
 * `ForumStore` over plain `HashMap`s guarded by a single `tokio::sync::RwLock`.
 * One lock covers all three tables so multi-table operations (post deletion,
 * like toggles) are atomic. Used when `DATABASE_URL` is not set and by the
 * test suite.
 */
use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::auth::users::User;
use crate::backend::comments::model::CommentRecord;
use crate::backend::posts::model::PostRecord;
use crate::backend::store::{
    CommentRemoval, ForumStore, LikeToggle, NewComment, NewPost, NewUser, PostChanges, PostFilter, PostFlag,
    ProfileChanges, StoreError, StoreResult,
};
use crate::shared::comment::{CommentEdit, DELETED_PLACEHOLDER};
use crate::shared::pagination::{PageRequest, PostSort, SortField, SortOrder};
use crate::shared::user::Role;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, PostRecord>,
    comments: HashMap<Uuid, CommentRecord>,
}

impl Tables {
    fn username_taken(&self, username: &str, except: Option<Uuid>) -> bool {
        self.users
            .values()
            .any(|u| u.username == username && Some(u.id) != except)
    }

    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

/// In-memory forum storage
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn toggle(likes: &mut Vec<Uuid>, user: Uuid) -> LikeToggle {
    let liked = match likes.iter().position(|id| *id == user) {
        Some(index) => {
            likes.remove(index);
            false
        }
        None => {
            likes.push(user);
            true
        }
    };
    LikeToggle {
        liked,
        likes_count: likes.len(),
    }
}

fn page_of<T: Clone>(items: &[T], page: PageRequest) -> Vec<T> {
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    items
        .iter()
        .skip(offset)
        .take(page.limit as usize)
        .cloned()
        .collect()
}

fn matches(post: &PostRecord, filter: &PostFilter) -> bool {
    if filter.published_only && !post.is_published {
        return false;
    }
    if filter.category.is_some_and(|c| c != post.category) {
        return false;
    }
    if filter.author.is_some_and(|a| a != post.author_id) {
        return false;
    }
    if filter.terms.is_empty() {
        return true;
    }
    let title = post.title.to_lowercase();
    let content = post.content.to_lowercase();
    let tags: Vec<String> = post.tags.iter().map(|t| t.to_lowercase()).collect();
    filter.terms.iter().any(|term| {
        title.contains(term.as_str())
            || content.contains(term.as_str())
            || tags.iter().any(|t| t.contains(term.as_str()))
    })
}

fn compare_posts(a: &PostRecord, b: &PostRecord, sort: PostSort) -> Ordering {
    if sort.pinned_first {
        let pinned = b.is_pinned.cmp(&a.is_pinned);
        if pinned != Ordering::Equal {
            return pinned;
        }
    }
    let by_field = match sort.field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::Views => a.views.cmp(&b.views),
        SortField::Likes => a.likes.len().cmp(&b.likes.len()),
    };
    let by_field = match sort.order {
        SortOrder::Asc => by_field,
        SortOrder::Desc => by_field.reverse(),
    };
    by_field
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl ForumStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.username_taken(&user.username, None) {
            return Err(StoreError::Duplicate { field: "username" });
        }
        if tables.email_taken(&user.email, None) {
            return Err(StoreError::Duplicate { field: "email" });
        }
        let now = Utc::now();
        let record = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_users(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(ids.iter().filter_map(|id| tables.users.get(id).cloned()).collect())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.users.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;
        if let Some(username) = changes.username.as_deref() {
            if tables.username_taken(username, Some(id)) {
                return Err(StoreError::Duplicate { field: "username" });
            }
        }
        if let Some(email) = changes.email.as_deref() {
            if tables.email_taken(email, Some(id)) {
                return Err(StoreError::Duplicate { field: "email" });
            }
        }
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn set_user_role(&self, id: Uuid, role: Role) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(&id).map(|user| {
            user.role = role;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn set_user_active(&self, id: Uuid, active: bool) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(&id).map(|user| {
            user.is_active = active;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn create_post(&self, post: NewPost) -> StoreResult<PostRecord> {
        let now = Utc::now();
        let record = PostRecord {
            id: Uuid::new_v4(),
            author_id: post.author_id,
            title: post.title,
            content: post.content,
            category: post.category,
            tags: post.tags,
            views: 0,
            likes: Vec::new(),
            is_published: true,
            is_pinned: false,
            is_locked: false,
            edit_history: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.tables
            .write()
            .await
            .posts
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_post(&self, id: Uuid) -> StoreResult<Option<PostRecord>> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn find_posts(&self, ids: &[Uuid]) -> StoreResult<Vec<PostRecord>> {
        let tables = self.tables.read().await;
        Ok(ids.iter().filter_map(|id| tables.posts.get(id).cloned()).collect())
    }

    async fn record_view(&self, id: Uuid) -> StoreResult<Option<PostRecord>> {
        let mut tables = self.tables.write().await;
        Ok(tables.posts.get_mut(&id).map(|post| {
            post.views += 1;
            post.clone()
        }))
    }

    async fn list_posts(
        &self,
        filter: &PostFilter,
        sort: PostSort,
        page: PageRequest,
    ) -> StoreResult<(Vec<PostRecord>, u64)> {
        let tables = self.tables.read().await;
        let mut found: Vec<&PostRecord> = tables.posts.values().filter(|p| matches(p, filter)).collect();
        found.sort_by(|a, b| compare_posts(a, b, sort));
        let total = found.len() as u64;
        let posts: Vec<PostRecord> = found.into_iter().cloned().collect();
        Ok((page_of(&posts, page), total))
    }

    async fn update_post(&self, id: Uuid, changes: PostChanges) -> StoreResult<Option<PostRecord>> {
        let mut tables = self.tables.write().await;
        let Some(post) = tables.posts.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(edit) = changes.edit {
            post.edit_history.push(edit);
        }
        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(content) = changes.content {
            post.content = content;
        }
        if let Some(category) = changes.category {
            post.category = category;
        }
        if let Some(tags) = changes.tags {
            post.tags = tags;
        }
        post.updated_at = Utc::now();
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.posts.remove(&id).is_none() {
            return Ok(false);
        }
        tables.comments.retain(|_, c| c.post_id != id);
        Ok(true)
    }

    async fn toggle_post_like(&self, id: Uuid, user: Uuid) -> StoreResult<Option<LikeToggle>> {
        let mut tables = self.tables.write().await;
        Ok(tables.posts.get_mut(&id).map(|post| toggle(&mut post.likes, user)))
    }

    async fn toggle_post_flag(&self, id: Uuid, flag: PostFlag) -> StoreResult<Option<bool>> {
        let mut tables = self.tables.write().await;
        Ok(tables.posts.get_mut(&id).map(|post| {
            let value = match flag {
                PostFlag::Pinned => &mut post.is_pinned,
                PostFlag::Locked => &mut post.is_locked,
            };
            *value = !*value;
            *value
        }))
    }

    async fn create_comment(&self, comment: NewComment) -> StoreResult<Option<CommentRecord>> {
        let mut tables = self.tables.write().await;
        if let Some(parent) = comment.parent_id {
            if !tables.comments.contains_key(&parent) {
                return Ok(None);
            }
        }

        let now = Utc::now();
        let record = CommentRecord {
            id: Uuid::new_v4(),
            post_id: comment.post_id,
            author_id: comment.author_id,
            parent_id: comment.parent_id,
            content: comment.content,
            likes: Vec::new(),
            is_edited: false,
            edit_history: Vec::new(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };
        tables.comments.insert(record.id, record.clone());
        Ok(Some(record))
    }

    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<CommentRecord>> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn list_root_comments(
        &self,
        post: Uuid,
        page: Option<PageRequest>,
    ) -> StoreResult<(Vec<CommentRecord>, u64)> {
        let tables = self.tables.read().await;
        let mut roots: Vec<CommentRecord> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post && c.parent_id.is_none() && !c.is_deleted)
            .cloned()
            .collect();
        roots.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        let total = roots.len() as u64;
        let roots = match page {
            Some(page) => page_of(&roots, page),
            None => roots,
        };
        Ok((roots, total))
    }

    async fn live_replies(&self, parents: &[Uuid]) -> StoreResult<Vec<CommentRecord>> {
        let tables = self.tables.read().await;
        let mut replies: Vec<CommentRecord> = tables
            .comments
            .values()
            .filter(|c| !c.is_deleted && c.parent_id.is_some_and(|p| parents.contains(&p)))
            .cloned()
            .collect();
        replies.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(replies)
    }

    async fn list_comments_by_author(
        &self,
        author: Uuid,
        page: PageRequest,
    ) -> StoreResult<(Vec<CommentRecord>, u64)> {
        let tables = self.tables.read().await;
        let mut mine: Vec<CommentRecord> = tables
            .comments
            .values()
            .filter(|c| c.author_id == author && !c.is_deleted)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        let total = mine.len() as u64;
        Ok((page_of(&mine, page), total))
    }

    async fn update_comment(
        &self,
        id: Uuid,
        content: &str,
        edit: CommentEdit,
    ) -> StoreResult<Option<CommentRecord>> {
        let mut tables = self.tables.write().await;
        Ok(tables.comments.get_mut(&id).map(|comment| {
            comment.edit_history.push(edit);
            comment.content = content.to_string();
            comment.is_edited = true;
            comment.updated_at = Utc::now();
            comment.clone()
        }))
    }

    async fn remove_comment(&self, id: Uuid) -> StoreResult<Option<CommentRemoval>> {
        let mut tables = self.tables.write().await;
        if !tables.comments.contains_key(&id) {
            return Ok(None);
        }

        let has_live_replies = tables
            .comments
            .values()
            .any(|c| c.parent_id == Some(id) && !c.is_deleted);
        if has_live_replies {
            if let Some(comment) = tables.comments.get_mut(&id) {
                comment.content = DELETED_PLACEHOLDER.to_string();
                comment.is_deleted = true;
                comment.updated_at = Utc::now();
            }
            return Ok(Some(CommentRemoval::SoftDeleted));
        }

        tables.comments.remove(&id);
        Ok(Some(CommentRemoval::Deleted))
    }

    async fn toggle_comment_like(&self, id: Uuid, user: Uuid) -> StoreResult<Option<LikeToggle>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .comments
            .get_mut(&id)
            .map(|comment| toggle(&mut comment.likes, user)))
    }
}
