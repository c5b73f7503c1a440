//! Authentication Handlers Module
//!
//! This module contains all HTTP handlers for the account endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs       - Module exports and documentation
//! ├── register.rs  - User registration handler
//! ├── login.rs     - User authentication handler
//! ├── me.rs        - Get current user handler
//! ├── password.rs  - Change password handler
//! └── profile.rs   - Update profile handler
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /api/auth/register
//! - **`login`** - POST /api/auth/login
//! - **`get_me`** - GET /api/auth/me
//! - **`change_password`** - POST /api/auth/change-password
//! - **`update_profile`** - PUT /api/auth/profile

/// Register handler
pub mod register;

/// Login handler
pub mod login;

/// Get current user handler
pub mod me;

/// Change password handler
pub mod password;

/// Update profile handler
pub mod profile;

pub use login::login;
pub use me::get_me;
pub use password::change_password;
pub use profile::update_profile;
pub use register::register;
