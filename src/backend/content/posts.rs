//! Database operations for posts, media and likes
//!
//! Posts are returned fully resolved (author projection, gate tier, media,
//! likes). Redaction for viewers without access happens in the handlers
//! through `Entitlements::apply`.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::shared::models::{Post, PublicProfile, SubscriptionTier};

/// Most media URLs a post may carry
pub const MAX_MEDIA: usize = 5;

/// Post fields supplied by the author
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub tier_id: Option<Uuid>,
    pub media: Vec<String>,
}

/// Partial post edit
///
/// `tier_id: Some(None)` removes the gate; `None` keeps it.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tier_id: Option<Option<Uuid>>,
    pub media: Option<Vec<String>>,
}

const POST_SELECT: &str = r#"
    SELECT p.id, p.title, p.content, p.created_at, p.tier_id,
           a.id AS author_id, a.username AS author_username, a.avatar AS author_avatar,
           t.creator_id AS tier_creator_id, t.name AS tier_name, t.price AS tier_price,
           t.description AS tier_description, t.image AS tier_image,
           t.created_at AS tier_created_at
    FROM posts p
    JOIN accounts a ON a.id = p.author_id
    LEFT JOIN subscription_tiers t ON t.id = p.tier_id
"#;

fn post_from_row(row: &SqliteRow) -> Result<Post, sqlx::Error> {
    let tier_id: Option<Uuid> = row.try_get("tier_id")?;
    let tier = match tier_id {
        Some(id) => Some(SubscriptionTier {
            id,
            creator_id: row.try_get("tier_creator_id")?,
            name: row.try_get("tier_name")?,
            price: row.try_get("tier_price")?,
            description: row.try_get("tier_description")?,
            image: row.try_get("tier_image")?,
            created_at: row.try_get("tier_created_at")?,
        }),
        None => None,
    };

    Ok(Post {
        id: row.try_get("id")?,
        author: PublicProfile {
            id: row.try_get("author_id")?,
            username: row.try_get("author_username")?,
            avatar: row.try_get("author_avatar")?,
        },
        tier,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        media: Vec::new(),
        likes: Vec::new(),
        created_at: row.try_get("created_at")?,
        locked: false,
    })
}

async fn load_media(pool: &SqlitePool, post_id: Uuid) -> Result<Vec<String>, sqlx::Error> {
    let rows = sqlx::query("SELECT url FROM post_media WHERE post_id = $1 ORDER BY position ASC")
        .bind(post_id)
        .fetch_all(pool)
        .await?;
    rows.iter().map(|r| r.try_get("url")).collect()
}

/// Accounts that liked a post, in like order
pub async fn load_likes(pool: &SqlitePool, post_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT account_id FROM post_likes WHERE post_id = $1 ORDER BY liked_at ASC, rowid ASC",
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;
    rows.iter().map(|r| r.try_get("account_id")).collect()
}

async fn hydrate(pool: &SqlitePool, rows: Vec<SqliteRow>) -> Result<Vec<Post>, sqlx::Error> {
    let mut posts = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut post = post_from_row(row)?;
        post.media = load_media(pool, post.id).await?;
        post.likes = load_likes(pool, post.id).await?;
        posts.push(post);
    }
    Ok(posts)
}

/// Create a post with its media
pub async fn create_post(
    pool: &SqlitePool,
    author_id: Uuid,
    draft: &PostDraft,
) -> Result<Post, sqlx::Error> {
    let id = Uuid::new_v4();
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO posts (id, author_id, tier_id, title, content, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(id)
    .bind(author_id)
    .bind(draft.tier_id)
    .bind(&draft.title)
    .bind(&draft.content)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;

    for (position, url) in draft.media.iter().enumerate() {
        sqlx::query("INSERT INTO post_media (post_id, position, url) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(position as i64)
            .bind(url)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    get_post(pool, id).await?.ok_or(sqlx::Error::RowNotFound)
}

/// Get a post by ID
pub async fn get_post(pool: &SqlitePool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    let row = sqlx::query(&format!("{POST_SELECT} WHERE p.id = $1"))
        .bind(post_id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => Ok(hydrate(pool, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

/// Author of a post, if the post exists
pub async fn get_post_author(pool: &SqlitePool, post_id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
    let row = sqlx::query("SELECT author_id FROM posts WHERE id = $1")
        .bind(post_id)
        .fetch_optional(pool)
        .await?;
    row.map(|r| r.try_get("author_id")).transpose()
}

/// All posts by an author, newest first
pub async fn list_posts_by_author(
    pool: &SqlitePool,
    author_id: Uuid,
) -> Result<Vec<Post>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        "{POST_SELECT} WHERE p.author_id = $1 ORDER BY p.created_at DESC, p.rowid DESC"
    ))
    .bind(author_id)
    .fetch_all(pool)
    .await?;

    hydrate(pool, rows).await
}

/// Newest posts the viewer may read: open, own, or gated by a purchased tier
pub async fn list_accessible_posts(
    pool: &SqlitePool,
    viewer_id: Uuid,
    limit: i64,
) -> Result<Vec<Post>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        r#"{POST_SELECT}
        WHERE p.tier_id IS NULL
           OR p.author_id = $1
           OR EXISTS (SELECT 1 FROM purchases pu WHERE pu.account_id = $1 AND pu.tier_id = p.tier_id)
        ORDER BY p.created_at DESC, p.rowid DESC
        LIMIT $2
        "#
    ))
    .bind(viewer_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    hydrate(pool, rows).await
}

/// Apply an edit; replaces the media list when one is given
pub async fn update_post(
    pool: &SqlitePool,
    post_id: Uuid,
    changes: &PostChanges,
) -> Result<Option<Post>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        r#"
        UPDATE posts
        SET title = COALESCE($1, title),
            content = COALESCE($2, content),
            tier_id = CASE WHEN $3 THEN $4 ELSE tier_id END
        WHERE id = $5
        "#,
    )
    .bind(changes.title.as_deref())
    .bind(changes.content.as_deref())
    .bind(changes.tier_id.is_some())
    .bind(changes.tier_id.flatten())
    .bind(post_id)
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        return Ok(None);
    }

    if let Some(media) = &changes.media {
        sqlx::query("DELETE FROM post_media WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;
        for (position, url) in media.iter().enumerate() {
            sqlx::query("INSERT INTO post_media (post_id, position, url) VALUES ($1, $2, $3)")
                .bind(post_id)
                .bind(position as i64)
                .bind(url)
                .execute(&mut *tx)
                .await?;
        }
    }

    tx.commit().await?;
    get_post(pool, post_id).await
}

/// Delete a post; media, likes and comments go with it
pub async fn delete_post(pool: &SqlitePool, post_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Like the post, or remove the like if present. Returns the new liker list.
pub async fn toggle_like(
    pool: &SqlitePool,
    post_id: Uuid,
    account_id: Uuid,
) -> Result<Vec<Uuid>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND account_id = $2")
        .bind(post_id)
        .bind(account_id)
        .execute(&mut *tx)
        .await?;

    if removed.rows_affected() == 0 {
        sqlx::query("INSERT INTO post_likes (post_id, account_id, liked_at) VALUES ($1, $2, $3)")
            .bind(post_id)
            .bind(account_id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    load_likes(pool, post_id).await
}
