//! Forum - Main Library
//!
//! A discussion-forum backend: posts with views, likes, tags and pin/lock
//! moderation, comments threaded one level deep, and an ownership/role
//! authorization model guarding every mutation.
//!
//! # Module Structure
//!
//! The library is organized into three main modules:
//!
//! - **`shared`** - Types shared between the server and API clients
//!   - Post, comment and user payloads
//!   - Request validation and pagination parsing
//!   - Error types
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server, routes and extractors
//!   - Authentication (bcrypt + JWT) and authorization checks
//!   - Post and comment services
//!   - Storage behind the `ForumStore` trait (PostgreSQL or in-memory)
//!
//! - **`client`** - Async HTTP client for the REST API
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Enables the `backend` module and the server binaries.
//!   Without it only the shared types and the API client are built.
//!
//! # Usage
//!
//! ```rust,no_run
//! # #[cfg(feature = "ssr")]
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use forum::backend::server::{config::ServerConfig, init::create_app};
//!
//! let config = ServerConfig::load()?;
//! let app = create_app(config).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;

/// HTTP client for the forum API
pub mod client;
