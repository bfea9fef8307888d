//! Database operations for direct messages
//!
//! Messages are append-only. `seq` is assigned by the store and is the
//! persistence order the relay broadcasts in; every listing orders by it.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::shared::models::{ChatMessage, DialogSummary, PublicProfile};

const MESSAGE_SELECT: &str = r#"
    SELECT m.seq, m.id, m.content, m.created_at,
           s.id AS sender_id, s.username AS sender_username, s.avatar AS sender_avatar,
           r.id AS recipient_id, r.username AS recipient_username, r.avatar AS recipient_avatar
    FROM messages m
    JOIN accounts s ON s.id = m.sender_id
    JOIN accounts r ON r.id = m.recipient_id
"#;

fn message_from_row(row: &SqliteRow) -> Result<ChatMessage, sqlx::Error> {
    Ok(ChatMessage {
        id: row.try_get("id")?,
        content: row.try_get("content")?,
        sender: PublicProfile {
            id: row.try_get("sender_id")?,
            username: row.try_get("sender_username")?,
            avatar: row.try_get("sender_avatar")?,
        },
        recipient: PublicProfile {
            id: row.try_get("recipient_id")?,
            username: row.try_get("recipient_username")?,
            avatar: row.try_get("recipient_avatar")?,
        },
        created_at: row.try_get("created_at")?,
    })
}

/// Persist a message and return it with both parties resolved
pub async fn insert_message(
    pool: &SqlitePool,
    sender_id: Uuid,
    recipient_id: Uuid,
    content: &str,
) -> Result<ChatMessage, sqlx::Error> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO messages (id, sender_id, recipient_id, content, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind(sender_id)
    .bind(recipient_id)
    .bind(content)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    let row = sqlx::query(&format!("{MESSAGE_SELECT} WHERE m.id = $1"))
        .bind(id)
        .fetch_one(pool)
        .await?;
    message_from_row(&row)
}

/// The latest `limit` messages between two accounts, oldest first
pub async fn dialog_window(
    pool: &SqlitePool,
    me: Uuid,
    counterpart: Uuid,
    limit: i64,
) -> Result<Vec<ChatMessage>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT * FROM ({MESSAGE_SELECT}
            WHERE (m.sender_id = $1 AND m.recipient_id = $2)
               OR (m.sender_id = $2 AND m.recipient_id = $1)
            ORDER BY m.seq DESC
            LIMIT $3)
        ORDER BY seq ASC
        "#
    ))
    .bind(me)
    .bind(counterpart)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.iter().map(message_from_row).collect()
}

/// Messages sent by an account, newest first
pub async fn list_sent(
    pool: &SqlitePool,
    sender_id: Uuid,
    limit: i64,
) -> Result<Vec<ChatMessage>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        "{MESSAGE_SELECT} WHERE m.sender_id = $1 ORDER BY m.seq DESC LIMIT $2"
    ))
    .bind(sender_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.iter().map(message_from_row).collect()
}

/// One entry per counterpart with the latest message, most recent dialog first
pub async fn list_dialogs(pool: &SqlitePool, me: Uuid) -> Result<Vec<DialogSummary>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        r#"
        {MESSAGE_SELECT}
        JOIN (
            SELECT MAX(seq) AS last_seq
            FROM messages
            WHERE sender_id = $1 OR recipient_id = $1
            GROUP BY CASE WHEN sender_id = $1 THEN recipient_id ELSE sender_id END
        ) d ON d.last_seq = m.seq
        ORDER BY m.seq DESC
        "#
    ))
    .bind(me)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let message = message_from_row(row)?;
            Ok(DialogSummary {
                user: message.counterpart(me).clone(),
                last_message: message.content,
                created_at: message.created_at,
            })
        })
        .collect()
}
