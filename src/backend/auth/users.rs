/**
 * User Model
 *
 * The stored account record, its public projections, and bcrypt password
 * hashing. Persistence lives behind `ForumStore`.
 */
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::backend::store::{ForumStore, StoreResult};
use crate::shared::user::{AuthorSummary, Role, UserProfile};

/// A forum account
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: Uuid,
    /// Username (unique, 2-30 chars, alphanumeric + underscore)
    pub username: String,
    /// Lowercased email address (unique)
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    pub role: Role,
    /// Inactive accounts cannot sign in or use existing tokens
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Public profile, without the password hash
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
            created_at: Some(self.created_at),
        }
    }

    pub fn author(&self) -> AuthorSummary {
        AuthorSummary {
            id: self.id,
            username: self.username.clone(),
            email: None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Authors keyed by id, used to resolve the `author` field of posts and comments
pub type AuthorMap = HashMap<Uuid, AuthorSummary>;

pub fn author_map(users: &[User]) -> AuthorMap {
    users.iter().map(|u| (u.id, u.author())).collect()
}

/// Resolve the given author ids in one store round trip
pub async fn load_authors(store: &dyn ForumStore, ids: &[Uuid]) -> StoreResult<AuthorMap> {
    if ids.is_empty() {
        return Ok(AuthorMap::new());
    }
    Ok(author_map(&store.find_users(ids).await?))
}

/// Hash a password with bcrypt
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

/// Verify a password against a bcrypt hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, hash)
}
