//! PostgreSQL test fixtures
//!
//! Tests using these helpers are `#[ignore]`d; they need a disposable
//! database named by `TEST_DATABASE_URL`. Every connect runs the migrations.

use forum::backend::store::PgStore;

pub const TEST_DATABASE_ENV: &str = "TEST_DATABASE_URL";

/// Connect to the test database
pub async fn pg_store() -> PgStore {
    let url = std::env::var(TEST_DATABASE_ENV)
        .unwrap_or_else(|_| panic!("{} must be set for database tests", TEST_DATABASE_ENV));
    PgStore::connect(&url, 5)
        .await
        .expect("Failed to connect to the test database")
}

/// A username/email pair unlikely to collide with earlier runs
pub fn unique_identity(prefix: &str) -> (String, String) {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let username = format!("{}_{}", prefix, &suffix[..12]);
    let email = format!("{}@example.com", username);
    (username, email)
}
