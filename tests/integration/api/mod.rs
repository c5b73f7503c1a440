//! API integration tests
//!
//! Each test builds its own `TestApp` over a fresh in-memory store.

mod app_test;
mod auth_test;
mod comments_test;
