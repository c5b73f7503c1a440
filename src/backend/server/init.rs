/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including storage loading, state creation, and route configuration.
 *
 * # Initialization Process
 *
 * 1. Load the storage backend (PostgreSQL with migrations, or in-memory)
 * 2. Build JWT keys from the configuration
 * 3. Create the router with all routes and middleware
 */
use std::sync::Arc;

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_store, ServerConfig};
use crate::backend::server::state::AppState;
use crate::backend::store::{ForumStore, StoreError};

/// Create and configure the Axum application
///
/// # Error Handling
///
/// A configured database that cannot be reached, or whose migrations fail,
/// aborts startup. Without `DATABASE_URL` the in-memory store is used.
pub async fn create_app(config: ServerConfig) -> Result<Router<()>, StoreError> {
    tracing::info!("Initializing forum backend server");

    let store = load_store(&config).await?;
    Ok(create_app_with_store(config, store))
}

/// Create the application over an already constructed store
///
/// Used by tests and tools that manage their own storage.
pub fn create_app_with_store(config: ServerConfig, store: Arc<dyn ForumStore>) -> Router<()> {
    let app_state = AppState::new(config, store);
    let app = create_router(app_state);
    tracing::info!("Router configured");
    app
}
