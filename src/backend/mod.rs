//! Backend Module
//!
//! This module contains all server-side code for the forum: an Axum HTTP
//! server exposing the `/api/auth`, `/api/posts` and `/api/comments`
//! endpoints over a pluggable storage backend.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, app creation
//! - **`routes`** - Route configuration, CORS/trace/body-limit layers
//! - **`middleware`** - Authentication extractors, typed extraction, permission checks
//! - **`auth`** - Users, bcrypt, JWT sessions, account handlers
//! - **`posts`** - Post records, service and handlers
//! - **`comments`** - Comment records, threads, service and handlers
//! - **`store`** - `ForumStore` trait with PostgreSQL and in-memory implementations
//! - **`error`** - Backend error type and its JSON response
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - forum-server binary
//! ├── seed.rs         - forum-seed binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── middleware/     - Extractors and permission checks
//! ├── auth/           - Accounts and sessions
//! ├── posts/          - Posts
//! ├── comments/       - Comments
//! ├── store/          - Persistence
//! └── error/          - Error types
//! ```
//!
//! # Request Flow
//!
//! route → extractors (path id, caller, body) → validation → service
//! (ownership/role checks) → store → JSON response. Every failure is a
//! `BackendError` rendered as `{"error", "status", "details"?}`.
//!
//! # Example
//!
//! ```rust,no_run
//! use forum::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(ServerConfig::load()?).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Request extractors and permission checks
pub mod middleware;

/// Posts
pub mod posts;

/// Comments and reply threads
pub mod comments;

/// Storage backends
pub mod store;

pub use error::{BackendError, BackendResult};
pub use server::{create_app, create_app_with_store, AppState, ServerConfig};
pub use store::{ForumStore, MemoryStore, PgStore};
