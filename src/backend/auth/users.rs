/**
 * Account Model and Database Operations
 *
 * The identity store: credentials, profile fields and the credit balance.
 * Balances are only ever changed by the credit-transfer engine; nothing in
 * this module writes `credits` after the account is created.
 */

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::backend::subscription::db::list_purchased_tiers;
use crate::shared::models::{AccountProfile, PublicProfile, UserProfile};

/// Account row as stored
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    pub description: String,
    pub avatar: String,
    pub cover: String,
    pub credits: i64,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn public_profile(&self) -> PublicProfile {
        PublicProfile {
            id: self.id,
            username: self.username.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// Profile fields a user may change about themselves
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub cover: Option<String>,
}

const ACCOUNT_COLUMNS: &str =
    "id, username, email, password_hash, description, avatar, cover, credits, created_at";

/// Create a new account with the configured starting balance
pub async fn create_account(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password_hash: &str,
    starting_credits: i64,
) -> Result<Account, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query_as::<_, Account>(&format!(
        r#"
        INSERT INTO accounts (id, username, email, password_hash, credits, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {ACCOUNT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(starting_credits)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Get account by ID
pub async fn get_account_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Account>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Get account by email
pub async fn get_account_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Whether an account with this ID exists
pub async fn account_exists<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM accounts WHERE id = $1)")
        .bind(id)
        .fetch_one(executor)
        .await?;
    Ok(exists)
}

/// Apply profile changes; absent fields keep their value
pub async fn update_profile(
    pool: &SqlitePool,
    id: Uuid,
    changes: &ProfileChanges,
) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        r#"
        UPDATE accounts
        SET username = COALESCE($1, username),
            email = COALESCE($2, email),
            description = COALESCE($3, description),
            avatar = COALESCE($4, avatar),
            cover = COALESCE($5, cover)
        WHERE id = $6
        RETURNING {ACCOUNT_COLUMNS}
        "#
    ))
    .bind(changes.username.as_deref())
    .bind(changes.email.as_deref())
    .bind(changes.description.as_deref())
    .bind(changes.avatar.as_deref())
    .bind(changes.cover.as_deref())
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Load an account with its purchased tiers, as its owner sees it
pub async fn load_account_profile(
    pool: &SqlitePool,
    id: Uuid,
) -> Result<Option<AccountProfile>, sqlx::Error> {
    let Some(account) = get_account_by_id(pool, id).await? else {
        return Ok(None);
    };
    let purchased_subscriptions = list_purchased_tiers(pool, id).await?;

    Ok(Some(AccountProfile {
        id: account.id,
        username: account.username,
        email: account.email,
        description: account.description,
        avatar: account.avatar,
        cover: account.cover,
        credits: account.credits,
        purchased_subscriptions,
    }))
}

/// Load an account as anyone else sees it (no balance)
pub async fn load_user_profile(
    pool: &SqlitePool,
    id: Uuid,
) -> Result<Option<UserProfile>, sqlx::Error> {
    Ok(load_account_profile(pool, id).await?.map(UserProfile::from))
}

/// Up to `limit` accounts in random order
pub async fn random_accounts(pool: &SqlitePool, limit: i64) -> Result<Vec<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY RANDOM() LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await
}
