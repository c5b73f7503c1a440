//! Shared Module
//!
//! Types shared between the server and API clients: request/response
//! payloads, validation rules, pagination parsing and error types. Nothing
//! in here touches storage or HTTP, so it builds without the `ssr` feature.
//!
//! # Overview
//!
//! ```text
//! shared/
//! ├── error.rs        # SharedError, FieldError
//! ├── validation.rs   # custom validator rules, ValidationErrors -> FieldError
//! ├── pagination.rs   # Pagination, PageRequest, ListQuery parsing
//! ├── user.rs         # Role, UserProfile, auth payloads
//! ├── post.rs         # Category, PostSummary/PostDetail, post payloads
//! ├── comment.rs      # CommentView/CommentThread, comment payloads
//! └── config/         # client configuration
//! ```

/// Shared error types
pub mod error;

/// Request validation helpers
pub mod validation;

/// Pagination and list query parsing
pub mod pagination;

/// Accounts and authentication payloads
pub mod user;

/// Post payloads
pub mod post;

/// Comment payloads
pub mod comment;

/// Client configuration
pub mod config;

pub use comment::{CommentThread, CommentView};
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::{FieldError, SharedError};
pub use pagination::{ListQuery, PageRequest, Pagination, SortField, SortOrder};
pub use post::{Category, PostDetail, PostSummary};
pub use user::{Role, UserProfile};
