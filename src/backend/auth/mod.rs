//! Authentication Module
//!
//! This module handles user accounts, password hashing and JWT sessions,
//! and exposes the HTTP handlers for the `/api/auth` endpoints.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model and bcrypt helpers
//! ├── sessions.rs     - JWT token management
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: username, email, password → user created → JWT returned
//! 2. **Login**: email, password → credentials verified → JWT returned
//! 3. **Authenticated requests**: `Authorization: Bearer <jwt>` → `AuthUser`
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Tokens are HS256 JWTs, valid for 7 days by default
//! - Unknown email and wrong password return the same 401

/// User data model and password hashing
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::{change_password, get_me, login, register, update_profile};
pub use sessions::{Claims, TokenKeys};
pub use users::User;
