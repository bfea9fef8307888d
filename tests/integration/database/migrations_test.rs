//! Database migration tests
//!
//! Tests to ensure migrations run correctly and the schema enforces the
//! constraints the store relies on.

use crate::common::{create_test_tier, create_test_user, TestDatabase};
use boosty::backend::auth::SessionKeys;
use std::time::Duration;

fn keys() -> SessionKeys {
    SessionKeys::new("migrations-test", Duration::from_secs(60))
}

#[tokio::test]
async fn test_all_tables_exist() {
    let db = TestDatabase::new().await;

    for table in [
        "accounts",
        "subscription_tiers",
        "purchases",
        "posts",
        "post_media",
        "post_likes",
        "comments",
        "messages",
    ] {
        let result = sqlx::query(&format!("SELECT 1 FROM {table} LIMIT 1"))
            .execute(db.pool())
            .await;
        assert!(result.is_ok(), "{table} table should exist");
    }
}

#[tokio::test]
async fn test_negative_balance_is_rejected() {
    let db = TestDatabase::new().await;
    let user = create_test_user(db.pool(), &keys(), "alice", 10).await;

    let result = sqlx::query("UPDATE accounts SET credits = -1 WHERE id = $1")
        .bind(user.id)
        .execute(db.pool())
        .await;
    assert!(result.is_err(), "credits must not go negative");
}

#[tokio::test]
async fn test_purchase_pair_is_unique() {
    let db = TestDatabase::new().await;
    let creator = create_test_user(db.pool(), &keys(), "creator", 0).await;
    let buyer = create_test_user(db.pool(), &keys(), "buyer", 100).await;
    let tier = create_test_tier(db.pool(), creator.id, 10).await;

    let insert = || {
        sqlx::query(
            "INSERT INTO purchases (account_id, tier_id, price_paid, purchased_at) VALUES ($1, $2, 10, '2025-01-01T00:00:00Z')",
        )
        .bind(buyer.id)
        .bind(tier.id)
        .execute(db.pool())
    };

    assert!(insert().await.is_ok());
    assert!(insert().await.is_err(), "second purchase row must be rejected");
}

#[tokio::test]
async fn test_foreign_keys_are_enforced() {
    let db = TestDatabase::new().await;

    let result = sqlx::query(
        "INSERT INTO subscription_tiers (id, creator_id, name, price, created_at) VALUES ($1, $2, 'x', 1, '2025-01-01T00:00:00Z')",
    )
    .bind(uuid::Uuid::new_v4())
    .bind(uuid::Uuid::new_v4())
    .execute(db.pool())
    .await;
    assert!(result.is_err(), "tier without a creator must be rejected");
}
