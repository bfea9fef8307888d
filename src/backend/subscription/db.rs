//! Database operations for subscription tiers
//!
//! Tier CRUD plus the purchased-tier relation reads. Writes to `purchases`
//! live in the credit-transfer engine only.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::shared::models::{PublicProfile, PurchasedTier, SubscriptionTier};

/// Tier fields supplied by a creator
#[derive(Debug, Clone)]
pub struct TierDraft {
    pub name: String,
    pub price: i64,
    pub description: String,
    pub image: Option<String>,
}

/// Partial tier edit; absent fields keep their value
#[derive(Debug, Clone, Default)]
pub struct TierChanges {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub description: Option<String>,
    pub image: Option<String>,
}

const TIER_COLUMNS: &str = "id, creator_id, name, price, description, image, created_at";

fn tier_from_row(row: &SqliteRow) -> Result<SubscriptionTier, sqlx::Error> {
    Ok(SubscriptionTier {
        id: row.try_get("id")?,
        creator_id: row.try_get("creator_id")?,
        name: row.try_get("name")?,
        price: row.try_get("price")?,
        description: row.try_get("description")?,
        image: row.try_get("image")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

/// Create a tier for a creator
pub async fn create_tier(
    pool: &SqlitePool,
    creator_id: Uuid,
    draft: &TierDraft,
) -> Result<SubscriptionTier, sqlx::Error> {
    let row = sqlx::query(&format!(
        r#"
        INSERT INTO subscription_tiers (id, creator_id, name, price, description, image, created_at)
        VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'https://via.placeholder.com/150'), $7)
        RETURNING {TIER_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(creator_id)
    .bind(&draft.name)
    .bind(draft.price)
    .bind(&draft.description)
    .bind(draft.image.as_deref())
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    tier_from_row(&row)
}

/// Get a tier by ID
pub async fn get_tier<'e, E>(executor: E, tier_id: Uuid) -> Result<Option<SubscriptionTier>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(&format!(
        "SELECT {TIER_COLUMNS} FROM subscription_tiers WHERE id = $1"
    ))
    .bind(tier_id)
    .fetch_optional(executor)
    .await?;

    row.as_ref().map(tier_from_row).transpose()
}

/// All tiers a creator sells, oldest first
pub async fn list_creator_tiers(
    pool: &SqlitePool,
    creator_id: Uuid,
) -> Result<Vec<SubscriptionTier>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {TIER_COLUMNS}
        FROM subscription_tiers
        WHERE creator_id = $1
        ORDER BY created_at ASC, rowid ASC
        "#
    ))
    .bind(creator_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(tier_from_row).collect()
}

/// Apply an edit to a tier
pub async fn update_tier(
    pool: &SqlitePool,
    tier_id: Uuid,
    changes: &TierChanges,
) -> Result<Option<SubscriptionTier>, sqlx::Error> {
    let row = sqlx::query(&format!(
        r#"
        UPDATE subscription_tiers
        SET name = COALESCE($1, name),
            price = COALESCE($2, price),
            description = COALESCE($3, description),
            image = COALESCE($4, image)
        WHERE id = $5
        RETURNING {TIER_COLUMNS}
        "#
    ))
    .bind(changes.name.as_deref())
    .bind(changes.price)
    .bind(changes.description.as_deref())
    .bind(changes.image.as_deref())
    .bind(tier_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(tier_from_row).transpose()
}

/// Number of posts gated behind a tier
pub async fn count_gated_posts(pool: &SqlitePool, tier_id: Uuid) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts WHERE tier_id = $1")
        .bind(tier_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Result of [`delete_tier`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierDeletion {
    Deleted,
    /// Posts are still gated by the tier; nothing was removed
    Gated(i64),
    Missing,
}

/// Delete a tier unless posts are gated by it; its purchase rows go with it
///
/// The gate check and the delete run as one statement. A post gated by the
/// tier concurrently either commits first and blocks the delete, or trips
/// the `posts.tier_id` foreign key, which is reported as `Gated` too.
pub async fn delete_tier(pool: &SqlitePool, tier_id: Uuid) -> Result<TierDeletion, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM subscription_tiers
        WHERE id = $1 AND NOT EXISTS (SELECT 1 FROM posts WHERE tier_id = $2)
        "#,
    )
    .bind(tier_id)
    .bind(tier_id)
    .execute(pool)
    .await;

    match result {
        Ok(done) if done.rows_affected() > 0 => return Ok(TierDeletion::Deleted),
        Ok(_) => {}
        Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {}
        Err(e) => return Err(e),
    }

    match count_gated_posts(pool, tier_id).await? {
        0 => Ok(TierDeletion::Missing),
        gated => Ok(TierDeletion::Gated(gated)),
    }
}

/// Whether `account_id` already holds `tier_id`
pub async fn has_purchased<'e, E>(executor: E, account_id: Uuid, tier_id: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let (exists,): (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM purchases WHERE account_id = $1 AND tier_id = $2)",
    )
    .bind(account_id)
    .bind(tier_id)
    .fetch_one(executor)
    .await?;
    Ok(exists)
}

/// Tiers an account has purchased, in purchase order
pub async fn list_purchased_tiers<'e, E>(
    executor: E,
    account_id: Uuid,
) -> Result<Vec<SubscriptionTier>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        r#"
        SELECT t.id, t.creator_id, t.name, t.price, t.description, t.image, t.created_at
        FROM purchases p
        JOIN subscription_tiers t ON t.id = p.tier_id
        WHERE p.account_id = $1
        ORDER BY p.purchased_at ASC, p.rowid ASC
        "#,
    )
    .bind(account_id)
    .fetch_all(executor)
    .await?;

    rows.iter().map(tier_from_row).collect()
}

/// Purchased tiers with the public projection of each creator
pub async fn list_purchased_with_creators(
    pool: &SqlitePool,
    account_id: Uuid,
) -> Result<Vec<PurchasedTier>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT t.id, t.creator_id, t.name, t.price, t.description, t.image, t.created_at,
               a.username AS creator_username, a.avatar AS creator_avatar
        FROM purchases p
        JOIN subscription_tiers t ON t.id = p.tier_id
        JOIN accounts a ON a.id = t.creator_id
        WHERE p.account_id = $1
        ORDER BY p.purchased_at ASC, p.rowid ASC
        "#,
    )
    .bind(account_id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let tier = tier_from_row(row)?;
            let creator = PublicProfile {
                id: tier.creator_id,
                username: row.try_get("creator_username")?,
                avatar: row.try_get("creator_avatar")?,
            };
            Ok(PurchasedTier { tier, creator })
        })
        .collect()
}
