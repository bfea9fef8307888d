/**
 * Server Configuration
 *
 * Loads the server settings from environment variables (after `.env` has been
 * read by the binary) and opens the SQLite pool.
 *
 * # Configuration Sources
 *
 * | Variable           | Default                        |
 * |--------------------|--------------------------------|
 * | `DATABASE_URL`     | `sqlite://boosty.db?mode=rwc`  |
 * | `SERVER_PORT`      | `5000`                         |
 * | `JWT_SECRET`       | development fallback (warned)  |
 * | `TOKEN_TTL_SECS`   | `3600`                         |
 * | `STARTING_CREDITS` | `1000`                         |
 * | `HISTORY_WINDOW`   | `50`                           |
 * | `BCRYPT_COST`      | `bcrypt::DEFAULT_COST`         |
 *
 * Unlike optional integrations, the database is required: a connection or
 * migration failure aborts startup.
 */

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

const DEV_JWT_SECRET: &str = "boosty-dev-secret-change-in-production";

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("{key} is out of range: {reason}")]
    OutOfRange {
        key: &'static str,
        reason: &'static str,
    },
}

/// Server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Validity window of issued tokens
    pub token_ttl: Duration,
    /// Balance every new account starts with
    pub starting_credits: i64,
    /// Size of the dialog message window and the sent-messages list
    pub history_window: i64,
    pub bcrypt_cost: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://boosty.db?mode=rwc".to_string(),
            port: 5000,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl: Duration::from_secs(60 * 60),
            starting_credits: 1000,
            history_window: 50,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl ServerConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET not set, using the development secret");
                defaults.jwt_secret
            }
        };

        let config = Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            port: parse(&lookup, "SERVER_PORT", defaults.port)?,
            jwt_secret,
            token_ttl: Duration::from_secs(parse(
                &lookup,
                "TOKEN_TTL_SECS",
                defaults.token_ttl.as_secs(),
            )?),
            starting_credits: parse(&lookup, "STARTING_CREDITS", defaults.starting_credits)?,
            history_window: parse(&lookup, "HISTORY_WINDOW", defaults.history_window)?,
            bcrypt_cost: parse(&lookup, "BCRYPT_COST", defaults.bcrypt_cost)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_credits < 0 {
            return Err(ConfigError::OutOfRange {
                key: "STARTING_CREDITS",
                reason: "must not be negative",
            });
        }
        if self.history_window <= 0 {
            return Err(ConfigError::OutOfRange {
                key: "HISTORY_WINDOW",
                reason: "must be positive",
            });
        }
        if self.token_ttl.is_zero() {
            return Err(ConfigError::OutOfRange {
                key: "TOKEN_TTL_SECS",
                reason: "must be positive",
            });
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::OutOfRange {
                key: "BCRYPT_COST",
                reason: "must be between 4 and 31",
            });
        }
        Ok(())
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}

/// Connect the SQLite pool and run migrations
///
/// In-memory databases live as long as their connection, so they get a single
/// connection that is never recycled.
pub async fn load_database(config: &ServerConfig) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("Connecting to database...");

    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .foreign_keys(true)
        .create_if_missing(true);

    let pool_options = if config.database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(8)
    };

    let pool = pool_options.connect_with(options).await?;
    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database migrations completed successfully");

    Ok(pool)
}
