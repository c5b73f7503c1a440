/**
 * Comment Handlers
 *
 * HTTP handlers for the `/api/comments` endpoints.
 *
 * # Endpoints
 *
 * - `GET /api/comments/post/{postId}` - Threads of a post
 * - `POST /api/comments/post/{postId}` - Comment or reply
 * - `GET /api/comments/my-comments` - Caller's comments
 * - `PUT /api/comments/{id}` - Edit (owner/admin)
 * - `DELETE /api/comments/{id}` - Delete (owner/admin)
 * - `POST /api/comments/{id}/like` - Toggle like
 */
use axum::{extract::State, http::StatusCode, response::Json};

use crate::backend::comments::service;
use crate::backend::error::BackendResult;
use crate::backend::middleware::{AuthUser, JsonBody, QueryParams, ResourceId};
use crate::backend::server::state::AppState;
use crate::shared::comment::{
    CommentEnvelope, CommentListResponse, CreateCommentRequest, MyCommentsResponse,
    UpdateCommentRequest,
};
use crate::shared::pagination::{ListQuery, DEFAULT_COMMENT_LIMIT};
use crate::shared::post::LikeResponse;
use crate::shared::user::MessageResponse;

pub async fn list_comments(
    State(state): State<AppState>,
    ResourceId(post_id): ResourceId,
    QueryParams(query): QueryParams<ListQuery>,
) -> BackendResult<Json<CommentListResponse>> {
    let page = query.page_request(DEFAULT_COMMENT_LIMIT)?;
    Ok(Json(service::list_for_post(state.store.as_ref(), post_id, page).await?))
}

pub async fn create_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ResourceId(post_id): ResourceId,
    JsonBody(request): JsonBody<CreateCommentRequest>,
) -> BackendResult<(StatusCode, Json<CommentEnvelope>)> {
    let comment = service::create_comment(state.store.as_ref(), &user, post_id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(CommentEnvelope {
            message: "Comment created".to_string(),
            comment,
        }),
    ))
}

pub async fn my_comments(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    QueryParams(query): QueryParams<ListQuery>,
) -> BackendResult<Json<MyCommentsResponse>> {
    let page = query.page_request(DEFAULT_COMMENT_LIMIT)?;
    Ok(Json(service::my_comments(state.store.as_ref(), &user, page).await?))
}

pub async fn update_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ResourceId(id): ResourceId,
    JsonBody(request): JsonBody<UpdateCommentRequest>,
) -> BackendResult<Json<CommentEnvelope>> {
    let comment = service::update_comment(state.store.as_ref(), &user, id, request).await?;
    Ok(Json(CommentEnvelope {
        message: "Comment updated".to_string(),
        comment,
    }))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ResourceId(id): ResourceId,
) -> BackendResult<Json<MessageResponse>> {
    service::delete_comment(state.store.as_ref(), &user, id).await?;
    Ok(Json(MessageResponse::new("Comment deleted")))
}

pub async fn like_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ResourceId(id): ResourceId,
) -> BackendResult<Json<LikeResponse>> {
    let toggle = service::toggle_like(state.store.as_ref(), &user, id).await?;
    Ok(Json(LikeResponse {
        message: if toggle.liked { "Comment liked" } else { "Like removed" }.to_string(),
        likes_count: toggle.likes_count,
        liked: toggle.liked,
    }))
}
