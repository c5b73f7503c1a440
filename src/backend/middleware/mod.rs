//! Middleware Module
//!
//! Request processing that runs before handler logic: extractors for the
//! caller's identity, typed path/body/query extraction, and the permission
//! checks the services apply.
//!
//! # Module Structure
//!
//! ```text
//! middleware/
//! ├── mod.rs          - Module exports
//! ├── auth.rs         - AuthUser / MaybeUser extractors
//! ├── extract.rs      - JsonBody, QueryParams, ResourceId
//! └── permissions.rs  - Ownership and role checks
//! ```

pub mod auth;
pub mod extract;
pub mod permissions;

pub use auth::{authenticate, bearer_token, AuthUser, MaybeUser};
pub use extract::{JsonBody, QueryParams, ResourceId};
pub use permissions::{check_ownership, ensure_owner_or_admin, ensure_role, Authored};
