/**
 * Credit-Transfer Engine
 *
 * Moves credits from a buyer to a tier's creator and records the entitlement,
 * all or nothing.
 *
 * # Purchase Process
 *
 * 1. Take the buyer's lock (purchases by one buyer never interleave)
 * 2. Validate: buyer exists, tier exists, funds suffice, tier not yet held,
 *    creator exists. Any failure returns before a write happens.
 * 3. In one transaction: conditional debit, purchase row, creator credit
 * 4. Return the buyer's refreshed profile
 *
 * The storage constraints back the lock up: the debit only applies while
 * `credits >= price`, and the `(account_id, tier_id)` primary key rejects a
 * second purchase row. Both are mapped to the same errors the validation
 * step reports.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use sqlx::SqlitePool;
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

use crate::backend::auth::users::{account_exists, get_account_by_id, load_account_profile};
use crate::backend::error::{BackendError, BackendResult, Entity};
use crate::backend::subscription::db::{get_tier, has_purchased};
use crate::shared::models::AccountProfile;

/// Per-account async locks
///
/// Entries are created on demand and pruned once no task holds or waits on
/// them.
#[derive(Clone, Default)]
pub struct AccountLocks {
    inner: Arc<Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access on behalf of `account_id`
    pub async fn acquire(&self, account_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(account_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of accounts currently tracked
    pub fn tracked(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[derive(Clone)]
pub struct CreditTransferEngine {
    pool: SqlitePool,
    locks: AccountLocks,
}

impl CreditTransferEngine {
    pub fn new(pool: SqlitePool, locks: AccountLocks) -> Self {
        Self { pool, locks }
    }

    /// Purchase `tier_id` for `buyer_id`
    pub async fn purchase(&self, buyer_id: Uuid, tier_id: Uuid) -> BackendResult<AccountProfile> {
        let _guard = self.locks.acquire(buyer_id).await;

        let buyer = get_account_by_id(&self.pool, buyer_id)
            .await?
            .ok_or_else(|| BackendError::not_found(Entity::Account))?;

        let tier = get_tier(&self.pool, tier_id)
            .await?
            .ok_or_else(|| BackendError::not_found(Entity::Tier))?;

        if buyer.credits < tier.price {
            tracing::warn!(
                "Purchase rejected: account {} has {} credits, tier {} costs {}",
                buyer_id,
                buyer.credits,
                tier_id,
                tier.price
            );
            return Err(BackendError::InsufficientFunds {
                balance: buyer.credits,
                price: tier.price,
            });
        }

        if has_purchased(&self.pool, buyer_id, tier_id).await? {
            return Err(BackendError::AlreadyPurchased);
        }

        if !account_exists(&self.pool, tier.creator_id).await? {
            tracing::warn!("Tier {} belongs to missing creator {}", tier_id, tier.creator_id);
            return Err(BackendError::not_found(Entity::Creator));
        }

        let mut tx = self.pool.begin().await?;

        let debited = sqlx::query(
            "UPDATE accounts SET credits = credits - $1 WHERE id = $2 AND credits >= $1",
        )
        .bind(tier.price)
        .bind(buyer_id)
        .execute(&mut *tx)
        .await?;
        if debited.rows_affected() == 0 {
            return Err(BackendError::InsufficientFunds {
                balance: buyer.credits,
                price: tier.price,
            });
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO purchases (account_id, tier_id, price_paid, purchased_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(buyer_id)
        .bind(tier_id)
        .bind(tier.price)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await;
        match inserted {
            Ok(_) => {}
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(BackendError::AlreadyPurchased);
            }
            Err(e) => return Err(e.into()),
        }

        let credited = sqlx::query("UPDATE accounts SET credits = credits + $1 WHERE id = $2")
            .bind(tier.price)
            .bind(tier.creator_id)
            .execute(&mut *tx)
            .await?;
        if credited.rows_affected() == 0 {
            return Err(BackendError::not_found(Entity::Creator));
        }

        tx.commit().await?;

        tracing::info!(
            "Account {} purchased tier {} from {} for {} credits",
            buyer_id,
            tier_id,
            tier.creator_id,
            tier.price
        );

        load_account_profile(&self.pool, buyer_id)
            .await?
            .ok_or_else(|| BackendError::not_found(Entity::Account))
    }
}
