/**
 * Comment Queries
 */
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::comments::model::CommentRecord;
use crate::backend::store::{CommentRemoval, LikeToggle, NewComment, StoreError, StoreResult};
use crate::shared::comment::{CommentEdit, DELETED_PLACEHOLDER};
use crate::shared::pagination::PageRequest;

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.post_id, c.author_id, c.parent_id, c.content, c.is_edited, c.is_deleted,
           c.created_at, c.updated_at,
           ARRAY(SELECT l.user_id FROM comment_likes l WHERE l.comment_id = c.id ORDER BY l.created_at) AS likes
    FROM comments c
"#;

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    post_id: Uuid,
    author_id: Uuid,
    parent_id: Option<Uuid>,
    content: String,
    is_edited: bool,
    is_deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    likes: Vec<Uuid>,
}

#[derive(Debug, sqlx::FromRow)]
struct EditRow {
    comment_id: Uuid,
    edited_at: DateTime<Utc>,
    previous_content: String,
}

/// Turn rows into records, attaching every row's edit history in one query
async fn hydrate(pool: &PgPool, rows: Vec<CommentRow>) -> StoreResult<Vec<CommentRecord>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let edits = sqlx::query_as::<_, EditRow>(
        r#"
        SELECT comment_id, edited_at, previous_content
        FROM comment_edits
        WHERE comment_id = ANY($1)
        ORDER BY id
        "#,
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut history: HashMap<Uuid, Vec<CommentEdit>> = HashMap::new();
    for edit in edits {
        history.entry(edit.comment_id).or_default().push(CommentEdit {
            edited_at: edit.edited_at,
            previous_content: edit.previous_content,
        });
    }

    Ok(rows
        .into_iter()
        .map(|row| CommentRecord {
            edit_history: history.remove(&row.id).unwrap_or_default(),
            id: row.id,
            post_id: row.post_id,
            author_id: row.author_id,
            parent_id: row.parent_id,
            content: row.content,
            likes: row.likes,
            is_edited: row.is_edited,
            is_deleted: row.is_deleted,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
        .collect())
}

fn window(page: PageRequest) -> (i64, i64) {
    (
        i64::from(page.limit),
        i64::try_from(page.offset()).unwrap_or(i64::MAX),
    )
}

/// The parent row is share-locked so a concurrent `remove` waits for this
/// insert and then sees the new reply
pub async fn create_comment(
    pool: &PgPool,
    comment: NewComment,
) -> StoreResult<Option<CommentRecord>> {
    let mut tx = pool.begin().await?;

    if let Some(parent) = comment.parent_id {
        let found = sqlx::query_scalar::<_, Uuid>("SELECT id FROM comments WHERE id = $1 FOR SHARE")
            .bind(parent)
            .fetch_optional(&mut *tx)
            .await?;
        if found.is_none() {
            return Ok(None);
        }
    }

    let id = Uuid::new_v4();
    let now = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO comments (id, post_id, author_id, parent_id, content, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        "#,
    )
    .bind(id)
    .bind(comment.post_id)
    .bind(comment.author_id)
    .bind(comment.parent_id)
    .bind(&comment.content)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    let record = get_comment(pool, id)
        .await?
        .ok_or_else(|| StoreError::Corrupt(format!("comment {id} vanished after insert")))?;
    Ok(Some(record))
}

pub async fn get_comment(pool: &PgPool, id: Uuid) -> StoreResult<Option<CommentRecord>> {
    let row = sqlx::query_as::<_, CommentRow>(&format!("{COMMENT_SELECT} WHERE c.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(hydrate(pool, row.into_iter().collect()).await?.pop())
}

pub async fn list_roots(
    pool: &PgPool,
    post: Uuid,
    page: Option<PageRequest>,
) -> StoreResult<(Vec<CommentRecord>, u64)> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM comments WHERE post_id = $1 AND parent_id IS NULL AND NOT is_deleted",
    )
    .bind(post)
    .fetch_one(pool)
    .await?;

    let sql = format!(
        "{COMMENT_SELECT} WHERE c.post_id = $1 AND c.parent_id IS NULL AND NOT c.is_deleted ORDER BY c.created_at DESC, c.id LIMIT $2 OFFSET $3"
    );
    let (limit, offset) = page.map(window).unwrap_or((i64::MAX, 0));
    let rows = sqlx::query_as::<_, CommentRow>(&sql)
        .bind(post)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok((hydrate(pool, rows).await?, u64::try_from(total).unwrap_or_default()))
}

pub async fn live_replies(pool: &PgPool, parents: &[Uuid]) -> StoreResult<Vec<CommentRecord>> {
    if parents.is_empty() {
        return Ok(Vec::new());
    }
    let rows = sqlx::query_as::<_, CommentRow>(&format!(
        "{COMMENT_SELECT} WHERE c.parent_id = ANY($1) AND NOT c.is_deleted ORDER BY c.created_at ASC, c.id"
    ))
    .bind(parents)
    .fetch_all(pool)
    .await?;
    hydrate(pool, rows).await
}

pub async fn list_by_author(
    pool: &PgPool,
    author: Uuid,
    page: PageRequest,
) -> StoreResult<(Vec<CommentRecord>, u64)> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM comments WHERE author_id = $1 AND NOT is_deleted",
    )
    .bind(author)
    .fetch_one(pool)
    .await?;

    let (limit, offset) = window(page);
    let rows = sqlx::query_as::<_, CommentRow>(&format!(
        "{COMMENT_SELECT} WHERE c.author_id = $1 AND NOT c.is_deleted ORDER BY c.created_at DESC, c.id LIMIT $2 OFFSET $3"
    ))
    .bind(author)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok((hydrate(pool, rows).await?, u64::try_from(total).unwrap_or_default()))
}

pub async fn update_content(
    pool: &PgPool,
    id: Uuid,
    content: &str,
    edit: CommentEdit,
) -> StoreResult<Option<CommentRecord>> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "UPDATE comments SET content = $1, is_edited = TRUE, updated_at = $2 WHERE id = $3",
    )
    .bind(content)
    .bind(Utc::now())
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }

    sqlx::query(
        "INSERT INTO comment_edits (comment_id, edited_at, previous_content) VALUES ($1, $2, $3)",
    )
    .bind(id)
    .bind(edit.edited_at)
    .bind(&edit.previous_content)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    get_comment(pool, id).await
}

/// Soft or hard delete in one transaction, holding the row lock across the
/// reply check
pub async fn remove(pool: &PgPool, id: Uuid) -> StoreResult<Option<CommentRemoval>> {
    let mut tx = pool.begin().await?;

    let exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM comments WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Ok(None);
    }

    let has_live_replies: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM comments WHERE parent_id = $1 AND NOT is_deleted)",
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    let removal = if has_live_replies {
        sqlx::query(
            "UPDATE comments SET content = $1, is_deleted = TRUE, updated_at = $2 WHERE id = $3",
        )
        .bind(DELETED_PLACEHOLDER)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;
        CommentRemoval::SoftDeleted
    } else {
        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        CommentRemoval::Deleted
    };

    tx.commit().await?;
    Ok(Some(removal))
}

pub async fn toggle_like(pool: &PgPool, id: Uuid, user: Uuid) -> StoreResult<Option<LikeToggle>> {
    let mut tx = pool.begin().await?;

    let exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM comments WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Ok(None);
    }

    let removed = sqlx::query("DELETE FROM comment_likes WHERE comment_id = $1 AND user_id = $2")
        .bind(id)
        .bind(user)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if removed == 0 {
        sqlx::query(
            "INSERT INTO comment_likes (comment_id, user_id, created_at) VALUES ($1, $2, $3) ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(user)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comment_likes WHERE comment_id = $1")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(Some(LikeToggle {
        liked: removed == 0,
        likes_count: usize::try_from(count).unwrap_or_default(),
    }))
}
