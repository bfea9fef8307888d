//! Database operations for comments

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::shared::models::{Comment, PublicProfile};

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.post_id, c.content, c.created_at,
           a.id AS author_id, a.username AS author_username, a.avatar AS author_avatar
    FROM comments c
    JOIN accounts a ON a.id = c.author_id
"#;

fn comment_from_row(row: &SqliteRow) -> Result<Comment, sqlx::Error> {
    Ok(Comment {
        id: row.try_get("id")?,
        post_id: row.try_get("post_id")?,
        author: PublicProfile {
            id: row.try_get("author_id")?,
            username: row.try_get("author_username")?,
            avatar: row.try_get("author_avatar")?,
        },
        content: row.try_get("content")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Create a comment on a post
pub async fn create_comment(
    pool: &SqlitePool,
    post_id: Uuid,
    author_id: Uuid,
    content: &str,
) -> Result<Comment, sqlx::Error> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO comments (id, post_id, author_id, content, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind(post_id)
    .bind(author_id)
    .bind(content)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    let row = sqlx::query(&format!("{COMMENT_SELECT} WHERE c.id = $1"))
        .bind(id)
        .fetch_one(pool)
        .await?;
    comment_from_row(&row)
}

/// Comments on a post, newest first
pub async fn list_comments(pool: &SqlitePool, post_id: Uuid) -> Result<Vec<Comment>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        "{COMMENT_SELECT} WHERE c.post_id = $1 ORDER BY c.created_at DESC, c.rowid DESC"
    ))
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(comment_from_row).collect()
}
