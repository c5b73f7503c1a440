//! API Client Module
//!
//! A typed async client for the forum REST API, built on `reqwest` and the
//! request/response types in [`crate::shared`].
//!
//! # Module Structure
//!
//! ```text
//! client/
//! ├── mod.rs    - Module exports
//! ├── api.rs    - ForumClient
//! └── error.rs  - ClientError
//! ```

pub mod api;
pub mod error;

pub use api::{ClientResult, ForumClient};
pub use error::ClientError;
