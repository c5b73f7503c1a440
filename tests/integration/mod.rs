//! Integration tests
//!
//! - `api` - HTTP endpoints through `axum_test::TestServer`
//! - `client_test` - `ForumClient` against `wiremock`
//! - `database` - `PgStore` against a real PostgreSQL (ignored by default)

mod api;
mod client_test;
mod database;
