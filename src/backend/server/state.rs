/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` holds:
 * - The storage backend (`Arc<dyn ForumStore>`)
 * - JWT signing/verification keys
 * - The loaded server configuration
 *
 * Everything is cheap to clone; handlers can extract the whole state or
 * just the part they need via `State<T>`.
 */
use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::auth::sessions::TokenKeys;
use crate::backend::server::config::ServerConfig;
use crate::backend::store::ForumStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ForumStore>,
    pub keys: TokenKeys,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig, store: Arc<dyn ForumStore>) -> Self {
        Self {
            keys: config.token_keys(),
            store,
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for Arc<dyn ForumStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for TokenKeys {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.keys.clone()
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
