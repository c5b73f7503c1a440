//! PostgreSQL store tests
//!
//! Run against `TEST_DATABASE_URL` with `cargo test -- --ignored`.

mod store_test;
