/**
 * User Queries
 */
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::auth::users::User;
use crate::backend::store::postgres::map_unique;
use crate::backend::store::{NewUser, ProfileChanges, StoreError, StoreResult};
use crate::shared::user::Role;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, role, is_active, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row.role.parse::<Role>().map_err(StoreError::Corrupt)?;
        Ok(User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            role,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn convert(row: Option<UserRow>) -> StoreResult<Option<User>> {
    row.map(User::try_from).transpose()
}

pub async fn create_user(pool: &PgPool, user: NewUser) -> StoreResult<User> {
    let now = Utc::now();
    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        INSERT INTO users (id, username, email, password_hash, role, is_active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, TRUE, $6, $6)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role.as_str())
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(map_unique)?;

    User::try_from(row)
}

pub async fn get_user_by_id(pool: &PgPool, id: Uuid) -> StoreResult<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    convert(row)
}

pub async fn get_user_by_email(pool: &PgPool, email: &str) -> StoreResult<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
        .bind(email)
        .fetch_optional(pool)
        .await?;
    convert(row)
}

pub async fn get_user_by_username(pool: &PgPool, username: &str) -> StoreResult<Option<User>> {
    let row =
        sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1"))
            .bind(username)
            .fetch_optional(pool)
            .await?;
    convert(row)
}

pub async fn get_users_by_ids(pool: &PgPool, ids: &[Uuid]) -> StoreResult<Vec<User>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows =
        sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"))
            .bind(ids)
            .fetch_all(pool)
            .await?;
    rows.into_iter().map(User::try_from).collect()
}

pub async fn update_password(pool: &PgPool, id: Uuid, password_hash: &str) -> StoreResult<bool> {
    let result = sqlx::query("UPDATE users SET password_hash = $1, updated_at = $2 WHERE id = $3")
        .bind(password_hash)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    changes: ProfileChanges,
) -> StoreResult<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        UPDATE users
        SET username = COALESCE($1, username),
            email = COALESCE($2, email),
            updated_at = $3
        WHERE id = $4
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(changes.username)
    .bind(changes.email)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(map_unique)?;
    convert(row)
}

pub async fn set_role(pool: &PgPool, id: Uuid, role: Role) -> StoreResult<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        "UPDATE users SET role = $1, updated_at = $2 WHERE id = $3 RETURNING {USER_COLUMNS}"
    ))
    .bind(role.as_str())
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await?;
    convert(row)
}

pub async fn set_active(pool: &PgPool, id: Uuid, active: bool) -> StoreResult<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        "UPDATE users SET is_active = $1, updated_at = $2 WHERE id = $3 RETURNING {USER_COLUMNS}"
    ))
    .bind(active)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await?;
    convert(row)
}
