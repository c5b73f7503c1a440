//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router, layers and fallback
//! └── api_routes.rs   - /api/auth, /api/posts, /api/comments
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use forum::backend::routes::create_router;
//! use forum::backend::server::{AppState, ServerConfig};
//! use forum::backend::store::MemoryStore;
//!
//! let state = AppState::new(ServerConfig::default(), Arc::new(MemoryStore::new()));
//! let router = create_router(state);
//! # let _ = router;
//! ```

/// Main router creation
pub mod router;

/// API endpoint routes
pub mod api_routes;

pub use router::create_router;
