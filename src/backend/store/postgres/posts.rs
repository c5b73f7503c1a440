/**
 * Post Queries
 *
 * Listing filters and ordering are assembled with `QueryBuilder` so that
 * every user-supplied value is bound, never interpolated.
 */
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::backend::posts::model::PostRecord;
use crate::backend::store::{LikeToggle, NewPost, PostChanges, PostFilter, PostFlag, StoreError, StoreResult};
use crate::shared::pagination::{PageRequest, PostSort, SortField, SortOrder};
use crate::shared::post::{Category, PostEdit};

const POST_SELECT: &str = r#"
    SELECT p.id, p.author_id, p.title, p.content, p.category, p.tags, p.views,
           p.is_published, p.is_pinned, p.is_locked, p.created_at, p.updated_at,
           ARRAY(SELECT l.user_id FROM post_likes l WHERE l.post_id = p.id ORDER BY l.created_at) AS likes
    FROM posts p
"#;

const LIKES_COUNT: &str = "(SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id)";

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    author_id: Uuid,
    title: String,
    content: String,
    category: String,
    tags: Vec<String>,
    views: i64,
    is_published: bool,
    is_pinned: bool,
    is_locked: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    likes: Vec<Uuid>,
}

impl TryFrom<PostRow> for PostRecord {
    type Error = StoreError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        let category = row.category.parse::<Category>().map_err(StoreError::Corrupt)?;
        Ok(PostRecord {
            id: row.id,
            author_id: row.author_id,
            title: row.title,
            content: row.content,
            category,
            tags: row.tags,
            views: row.views,
            likes: row.likes,
            is_published: row.is_published,
            is_pinned: row.is_pinned,
            is_locked: row.is_locked,
            edit_history: Vec::new(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EditRow {
    edited_at: DateTime<Utc>,
    edited_by: Option<Uuid>,
    previous_content: String,
}

async fn load_edit_history(pool: &PgPool, post_id: Uuid) -> StoreResult<Vec<PostEdit>> {
    let rows = sqlx::query_as::<_, EditRow>(
        r#"
        SELECT edited_at, edited_by, previous_content
        FROM post_edits
        WHERE post_id = $1
        ORDER BY id
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| PostEdit {
            edited_at: r.edited_at,
            edited_by: r.edited_by,
            previous_content: r.previous_content,
        })
        .collect())
}

/// Escape `%`, `_` and `\` so a term matches literally inside `ILIKE`
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &PostFilter) {
    builder.push(" WHERE TRUE");
    if filter.published_only {
        builder.push(" AND p.is_published = TRUE");
    }
    if let Some(category) = filter.category {
        builder.push(" AND p.category = ").push_bind(category.as_str());
    }
    if let Some(author) = filter.author {
        builder.push(" AND p.author_id = ").push_bind(author);
    }
    if !filter.terms.is_empty() {
        let patterns: Vec<String> = filter.terms.iter().map(|t| like_pattern(t)).collect();
        builder
            .push(" AND (p.title ILIKE ANY(")
            .push_bind(patterns.clone())
            .push(") OR p.content ILIKE ANY(")
            .push_bind(patterns.clone())
            .push(") OR EXISTS (SELECT 1 FROM unnest(p.tags) AS t(tag) WHERE t.tag ILIKE ANY(")
            .push_bind(patterns)
            .push(")))");
    }
}

fn order_clause(sort: PostSort) -> String {
    let column = match sort.field {
        SortField::CreatedAt => "p.created_at",
        SortField::UpdatedAt => "p.updated_at",
        SortField::Views => "p.views",
        SortField::Likes => LIKES_COUNT,
    };
    let direction = match sort.order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };
    let pinned = if sort.pinned_first { "p.is_pinned DESC, " } else { "" };
    format!(" ORDER BY {pinned}{column} {direction}, p.created_at DESC, p.id")
}

pub async fn create_post(pool: &PgPool, post: NewPost) -> StoreResult<PostRecord> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO posts (id, author_id, title, content, category, tags, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        "#,
    )
    .bind(id)
    .bind(post.author_id)
    .bind(&post.title)
    .bind(&post.content)
    .bind(post.category.as_str())
    .bind(&post.tags)
    .bind(now)
    .execute(pool)
    .await?;

    get_post(pool, id)
        .await?
        .ok_or_else(|| StoreError::Corrupt(format!("post {id} vanished after insert")))
}

/// Full post including edit history
pub async fn get_post(pool: &PgPool, id: Uuid) -> StoreResult<Option<PostRecord>> {
    let row = sqlx::query_as::<_, PostRow>(&format!("{POST_SELECT} WHERE p.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let Some(row) = row else {
        return Ok(None);
    };
    let mut post = PostRecord::try_from(row)?;
    post.edit_history = load_edit_history(pool, id).await?;
    Ok(Some(post))
}

/// Posts without edit history
pub async fn get_posts_by_ids(pool: &PgPool, ids: &[Uuid]) -> StoreResult<Vec<PostRecord>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = sqlx::query_as::<_, PostRow>(&format!("{POST_SELECT} WHERE p.id = ANY($1)"))
        .bind(ids)
        .fetch_all(pool)
        .await?;
    rows.into_iter().map(PostRecord::try_from).collect()
}

pub async fn increment_views(pool: &PgPool, id: Uuid) -> StoreResult<Option<PostRecord>> {
    let result = sqlx::query("UPDATE posts SET views = views + 1 WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_post(pool, id).await
}

pub async fn list_posts(
    pool: &PgPool,
    filter: &PostFilter,
    sort: PostSort,
    page: PageRequest,
) -> StoreResult<(Vec<PostRecord>, u64)> {
    let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM posts p");
    push_filters(&mut count, filter);
    let total: i64 = count.build_query_scalar::<i64>().fetch_one(pool).await?;

    let mut select = QueryBuilder::<Postgres>::new(POST_SELECT);
    push_filters(&mut select, filter);
    select.push(order_clause(sort));
    select
        .push(" LIMIT ")
        .push_bind(i64::from(page.limit))
        .push(" OFFSET ")
        .push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));

    let rows = select.build_query_as::<PostRow>().fetch_all(pool).await?;
    let posts = rows
        .into_iter()
        .map(PostRecord::try_from)
        .collect::<StoreResult<Vec<_>>>()?;

    Ok((posts, u64::try_from(total).unwrap_or_default()))
}

pub async fn update_post(
    pool: &PgPool,
    id: Uuid,
    changes: PostChanges,
) -> StoreResult<Option<PostRecord>> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE posts
        SET title = COALESCE($1, title),
            content = COALESCE($2, content),
            category = COALESCE($3, category),
            tags = COALESCE($4, tags),
            updated_at = $5
        WHERE id = $6
        "#,
    )
    .bind(changes.title)
    .bind(changes.content)
    .bind(changes.category.map(|c| c.as_str()))
    .bind(changes.tags)
    .bind(Utc::now())
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    if let Some(edit) = changes.edit {
        sqlx::query(
            "INSERT INTO post_edits (post_id, edited_at, edited_by, previous_content) VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(edit.edited_at)
        .bind(edit.edited_by)
        .bind(&edit.previous_content)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    get_post(pool, id).await
}

/// Comments, likes and edits go with the post via `ON DELETE CASCADE`
pub async fn delete_post(pool: &PgPool, id: Uuid) -> StoreResult<bool> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn toggle_like(pool: &PgPool, id: Uuid, user: Uuid) -> StoreResult<Option<LikeToggle>> {
    let mut tx = pool.begin().await?;

    // Row lock serializes concurrent toggles on the same post
    let exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM posts WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Ok(None);
    }

    let removed = sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
        .bind(id)
        .bind(user)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if removed == 0 {
        sqlx::query(
            "INSERT INTO post_likes (post_id, user_id, created_at) VALUES ($1, $2, $3) ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(user)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM post_likes WHERE post_id = $1")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(Some(LikeToggle {
        liked: removed == 0,
        likes_count: usize::try_from(count).unwrap_or_default(),
    }))
}

pub async fn toggle_flag(pool: &PgPool, id: Uuid, flag: PostFlag) -> StoreResult<Option<bool>> {
    let sql = match flag {
        PostFlag::Pinned => "UPDATE posts SET is_pinned = NOT is_pinned WHERE id = $1 RETURNING is_pinned",
        PostFlag::Locked => "UPDATE posts SET is_locked = NOT is_locked WHERE id = $1 RETURNING is_locked",
    };
    let value = sqlx::query_scalar::<_, bool>(sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(value)
}
