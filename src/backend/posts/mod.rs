//! Posts Module
//!
//! Storage record, service logic and HTTP handlers for forum posts.
//!
//! # Module Structure
//!
//! ```text
//! posts/
//! ├── mod.rs       - Module exports
//! ├── model.rs     - PostRecord and its wire projections
//! ├── service.rs   - Listing, detail, edits, likes, pin/lock
//! └── handlers.rs  - /api/posts handlers
//! ```

pub mod handlers;
pub mod model;
pub mod service;

pub use model::PostRecord;
