/**
 * Post Handlers
 *
 * HTTP handlers for the `/api/posts` endpoints. Each handler extracts the
 * caller, path id, query or body and delegates to the post service.
 *
 * # Endpoints
 *
 * - `GET /api/posts` - Published posts (optional auth)
 * - `GET /api/posts/my-posts` - Caller's posts
 * - `GET /api/posts/{id}` - Post detail, counts a view (optional auth)
 * - `POST /api/posts` - Create
 * - `PUT /api/posts/{id}` - Update (owner/admin)
 * - `DELETE /api/posts/{id}` - Delete with comments (owner/admin)
 * - `POST /api/posts/{id}/like` - Toggle like
 * - `POST /api/posts/{id}/pin` - Toggle pin (admin/moderator)
 * - `POST /api/posts/{id}/lock` - Toggle lock (admin/moderator)
 */
use axum::{extract::State, http::StatusCode, response::Json};

use crate::backend::error::BackendResult;
use crate::backend::middleware::{AuthUser, JsonBody, MaybeUser, QueryParams, ResourceId};
use crate::backend::posts::service;
use crate::backend::server::state::AppState;
use crate::backend::store::PostFlag;
use crate::shared::pagination::{ListQuery, DEFAULT_POST_LIMIT};
use crate::shared::post::{
    CreatePostRequest, LikeResponse, LockResponse, PinResponse, PostDetail, PostEnvelope,
    PostListResponse, UpdatePostRequest,
};
use crate::shared::user::MessageResponse;

/// List published posts
///
/// # Query Parameters
///
/// `page`, `limit`, `sortBy` (`createdAt`, `updatedAt`, `views`, `likes`),
/// `order` (`asc`, `desc`), `category`, `author`, `search`.
pub async fn list_posts(
    State(state): State<AppState>,
    viewer: MaybeUser,
    QueryParams(query): QueryParams<ListQuery>,
) -> BackendResult<Json<PostListResponse>> {
    let params = query.post_params()?;
    let response = service::list_posts(state.store.as_ref(), &params, viewer.id()).await?;
    Ok(Json(response))
}

pub async fn my_posts(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    QueryParams(query): QueryParams<ListQuery>,
) -> BackendResult<Json<PostListResponse>> {
    let page = query.page_request(DEFAULT_POST_LIMIT)?;
    Ok(Json(service::my_posts(state.store.as_ref(), &user, page).await?))
}

pub async fn get_post(
    State(state): State<AppState>,
    viewer: MaybeUser,
    ResourceId(id): ResourceId,
) -> BackendResult<Json<PostDetail>> {
    Ok(Json(service::get_post(state.store.as_ref(), id, viewer.id()).await?))
}

pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(request): JsonBody<CreatePostRequest>,
) -> BackendResult<(StatusCode, Json<PostEnvelope>)> {
    let post = service::create_post(state.store.as_ref(), &user, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(PostEnvelope {
            message: "Post created".to_string(),
            post,
        }),
    ))
}

pub async fn update_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ResourceId(id): ResourceId,
    JsonBody(request): JsonBody<UpdatePostRequest>,
) -> BackendResult<Json<PostEnvelope>> {
    let post = service::update_post(state.store.as_ref(), &user, id, request).await?;
    Ok(Json(PostEnvelope {
        message: "Post updated".to_string(),
        post,
    }))
}

pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ResourceId(id): ResourceId,
) -> BackendResult<Json<MessageResponse>> {
    service::delete_post(state.store.as_ref(), &user, id).await?;
    Ok(Json(MessageResponse::new("Post deleted")))
}

pub async fn like_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ResourceId(id): ResourceId,
) -> BackendResult<Json<LikeResponse>> {
    let toggle = service::toggle_like(state.store.as_ref(), &user, id).await?;
    Ok(Json(LikeResponse {
        message: if toggle.liked { "Post liked" } else { "Like removed" }.to_string(),
        likes_count: toggle.likes_count,
        liked: toggle.liked,
    }))
}

pub async fn pin_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ResourceId(id): ResourceId,
) -> BackendResult<Json<PinResponse>> {
    let is_pinned = service::toggle_flag(state.store.as_ref(), &user, id, PostFlag::Pinned).await?;
    Ok(Json(PinResponse {
        message: if is_pinned { "Post pinned" } else { "Post unpinned" }.to_string(),
        is_pinned,
    }))
}

pub async fn lock_post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ResourceId(id): ResourceId,
) -> BackendResult<Json<LockResponse>> {
    let is_locked = service::toggle_flag(state.store.as_ref(), &user, id, PostFlag::Locked).await?;
    Ok(Json(LockResponse {
        message: if is_locked { "Post locked" } else { "Post unlocked" }.to_string(),
        is_locked,
    }))
}
