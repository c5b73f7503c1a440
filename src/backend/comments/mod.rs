//! Comments Module
//!
//! Storage record, service logic and HTTP handlers for comments and their
//! one-level reply threads.
//!
//! # Module Structure
//!
//! ```text
//! comments/
//! ├── mod.rs       - Module exports
//! ├── model.rs     - CommentRecord, projections, thread assembly
//! ├── service.rs   - Replies, edits, soft/hard delete, likes
//! └── handlers.rs  - /api/comments handlers
//! ```

pub mod handlers;
pub mod model;
pub mod service;

pub use model::CommentRecord;
