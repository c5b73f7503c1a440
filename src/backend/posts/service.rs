/**
 * Post Service
 *
 * Post operations on top of `ForumStore`: listing with author resolution,
 * the detail view with threaded comments, edit history, likes, and the
 * moderator pin/lock toggles.
 */
use chrono::Utc;
use uuid::Uuid;

use crate::backend::auth::users::{load_authors, AuthorMap, User};
use crate::backend::comments::service::load_threads;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::permissions::{ensure_owner_or_admin, ensure_role};
use crate::backend::posts::model::PostRecord;
use crate::backend::store::{ForumStore, LikeToggle, NewPost, PostChanges, PostFilter, PostFlag};
use crate::shared::error::SharedError;
use crate::shared::pagination::{PageRequest, Pagination, PostListParams, PostSort};
use crate::shared::post::{
    Category, CreatePostRequest, PostDetail, PostEdit, PostListResponse, PostSummary,
    UpdatePostRequest,
};
use crate::shared::user::Role;
use crate::shared::validation::check;

const POST_NOT_FOUND: &str = "Post not found";

/// Roles allowed to pin and lock posts
pub const MODERATION_ROLES: [Role; 2] = [Role::Admin, Role::Moderator];

async fn summaries(
    store: &dyn ForumStore,
    records: &[PostRecord],
    viewer: Option<Uuid>,
) -> BackendResult<Vec<PostSummary>> {
    let mut ids: Vec<Uuid> = records.iter().map(|p| p.author_id).collect();
    ids.sort_unstable();
    ids.dedup();
    let authors = load_authors(store, &ids).await?;
    Ok(records.iter().map(|p| p.summary(&authors, viewer)).collect())
}

/// Published posts matching the listing parameters
pub async fn list_posts(
    store: &dyn ForumStore,
    params: &PostListParams,
    viewer: Option<Uuid>,
) -> BackendResult<PostListResponse> {
    let filter = PostFilter::from(params);
    let (records, total) = store.list_posts(&filter, params.sort, params.page).await?;
    Ok(PostListResponse {
        posts: summaries(store, &records, viewer).await?,
        pagination: Pagination::new(total, params.page),
    })
}

/// The caller's posts, published or not, newest first
pub async fn my_posts(
    store: &dyn ForumStore,
    user: &User,
    page: PageRequest,
) -> BackendResult<PostListResponse> {
    let filter = PostFilter::by_author(user.id);
    let (records, total) = store.list_posts(&filter, PostSort::newest(), page).await?;
    Ok(PostListResponse {
        posts: summaries(store, &records, Some(user.id)).await?,
        pagination: Pagination::new(total, page),
    })
}

/// Count a view and return the post with its author, history and comments
pub async fn get_post(
    store: &dyn ForumStore,
    id: Uuid,
    viewer: Option<Uuid>,
) -> BackendResult<PostDetail> {
    let post = store
        .record_view(id)
        .await?
        .ok_or_else(|| BackendError::not_found(POST_NOT_FOUND))?;

    let author = store.find_user(post.author_id).await?.map(|user| {
        let mut author = user.author();
        author.email = Some(user.email);
        author
    });
    let (comments, _) = load_threads(store, post.id, None).await?;

    Ok(post.detail(author, viewer, comments))
}

pub async fn create_post(
    store: &dyn ForumStore,
    user: &User,
    request: CreatePostRequest,
) -> BackendResult<PostSummary> {
    let request = request.normalized();
    check(&request)?;

    let category = parse_category(request.category.as_deref())?.unwrap_or_default();
    let post = store
        .create_post(NewPost {
            author_id: user.id,
            title: request.title,
            content: request.content,
            category,
            tags: clean_tags(request.tags.unwrap_or_default()),
        })
        .await?;

    tracing::info!("Post {} created by {}", post.id, user.id);
    Ok(post.summary(&AuthorMap::from([(user.id, user.author())]), Some(user.id)))
}

/// Update a post; 404, then 403, then validation
pub async fn update_post(
    store: &dyn ForumStore,
    user: &User,
    id: Uuid,
    request: UpdatePostRequest,
) -> BackendResult<PostSummary> {
    let existing = ensure_owner_or_admin(user, store.find_post(id).await?, POST_NOT_FOUND)?;
    let request = request.normalized();
    check(&request)?;

    let edit = request
        .content
        .as_ref()
        .filter(|content| **content != existing.content)
        .map(|_| PostEdit {
            edited_at: Utc::now(),
            edited_by: Some(user.id),
            previous_content: existing.content.clone(),
        });

    let changes = PostChanges {
        title: request.title,
        content: request.content,
        category: parse_category(request.category.as_deref())?,
        tags: request.tags.map(clean_tags),
        edit,
    };
    let updated = store
        .update_post(id, changes)
        .await?
        .ok_or_else(|| BackendError::not_found(POST_NOT_FOUND))?;

    tracing::info!("Post {} updated by {}", id, user.id);
    let authors = load_authors(store, &[updated.author_id]).await?;
    Ok(updated.summary(&authors, Some(user.id)))
}

/// Delete a post together with all of its comments
pub async fn delete_post(store: &dyn ForumStore, user: &User, id: Uuid) -> BackendResult<()> {
    ensure_owner_or_admin(user, store.find_post(id).await?, POST_NOT_FOUND)?;
    if !store.delete_post(id).await? {
        return Err(BackendError::not_found(POST_NOT_FOUND));
    }
    tracing::info!("Post {} deleted by {}", id, user.id);
    Ok(())
}

pub async fn toggle_like(store: &dyn ForumStore, user: &User, id: Uuid) -> BackendResult<LikeToggle> {
    let toggle = store
        .toggle_post_like(id, user.id)
        .await?
        .ok_or_else(|| BackendError::not_found(POST_NOT_FOUND))?;
    tracing::debug!("Post {} like by {}: {}", id, user.id, toggle.liked);
    Ok(toggle)
}

/// Flip the pinned or locked flag; moderators and admins only
pub async fn toggle_flag(
    store: &dyn ForumStore,
    user: &User,
    id: Uuid,
    flag: PostFlag,
) -> BackendResult<bool> {
    ensure_role(user, &MODERATION_ROLES)?;
    let value = store
        .toggle_post_flag(id, flag)
        .await?
        .ok_or_else(|| BackendError::not_found(POST_NOT_FOUND))?;
    tracing::info!("Post {} {:?} set to {} by {}", id, flag, value, user.id);
    Ok(value)
}

fn parse_category(raw: Option<&str>) -> Result<Option<Category>, SharedError> {
    raw.map(str::parse::<Category>)
        .transpose()
        .map_err(|_| SharedError::validation("category", "Please choose a valid category"))
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter().filter(|tag| !tag.is_empty()).collect()
}
