/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Layers
 *
 * Outermost first:
 * 1. `TraceLayer` - request/response logging
 * 2. `CorsLayer` - allowed origins from `ServerConfig`
 * 3. `DefaultBodyLimit` - maximum request body size
 *
 * Unknown routes get a JSON 404 from the fallback handler.
 */
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Routes
///
/// - `GET /` - API info
/// - `/api/auth/*`, `/api/posts/*`, `/api/comments/*` - see `api_routes`
/// - anything else - 404 `{"error": "Requested resource not found"}`
pub fn create_router(app_state: AppState) -> Router<()> {
    let cors = cors_layer(&app_state.config);
    let body_limit = app_state.config.body_limit_bytes;

    let router = Router::new().route("/", get(api_info));
    let router = configure_api_routes(router);

    router
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn api_info() -> Json<Value> {
    Json(json!({
        "message": "Forum API Server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": "/api/auth",
            "posts": "/api/posts",
            "comments": "/api/comments",
        }
    }))
}

async fn not_found() -> BackendError {
    BackendError::not_found("Requested resource not found")
}
