/**
 * API Route Handlers
 *
 * This module wires the `/api` endpoints to their handlers.
 *
 * # Routes
 *
 * ## Authentication
 * - `POST /api/auth/register`
 * - `POST /api/auth/login`
 * - `GET /api/auth/me`
 * - `POST /api/auth/change-password`
 * - `PUT /api/auth/profile`
 *
 * ## Posts
 * - `GET|POST /api/posts`
 * - `GET /api/posts/my-posts`
 * - `GET|PUT|DELETE /api/posts/{id}`
 * - `POST /api/posts/{id}/like`, `/pin`, `/lock`
 *
 * ## Comments
 * - `GET|POST /api/comments/post/{postId}`
 * - `GET /api/comments/my-comments`
 * - `PUT|DELETE /api/comments/{id}`
 * - `POST /api/comments/{id}/like`
 */
use axum::{
    routing::{get, post},
    Router,
};

use crate::backend::auth::{change_password, get_me, login, register, update_profile};
use crate::backend::comments::handlers as comments;
use crate::backend::posts::handlers as posts;
use crate::backend::server::state::AppState;

/// Configure all API routes on the given router
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .nest("/api/auth", auth_routes())
        .nest("/api/posts", post_routes())
        .nest("/api/comments", comment_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(get_me))
        .route("/change-password", post(change_password))
        .route("/profile", axum::routing::put(update_profile))
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(posts::list_posts).post(posts::create_post))
        .route("/my-posts", get(posts::my_posts))
        .route(
            "/{id}",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/{id}/like", post(posts::like_post))
        .route("/{id}/pin", post(posts::pin_post))
        .route("/{id}/lock", post(posts::lock_post))
}

fn comment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/post/{post_id}",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route("/my-comments", get(comments::my_comments))
        .route(
            "/{id}",
            axum::routing::put(comments::update_comment).delete(comments::delete_comment),
        )
        .route("/{id}/like", post(comments::like_comment))
}
