//! Database test fixtures and utilities
//!
//! Every fixture owns a private SQLite database with the migrations applied,
//! so tests never share state. `on_disk` fixtures use a file in a temporary
//! directory and a multi-connection pool for tests that need writers to
//! really interleave.

use std::time::Duration;

use boosty::backend::server::config::{load_database, ServerConfig};
use boosty::backend::server::state::AppState;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Server configuration used by tests
///
/// Cheap bcrypt rounds keep login tests fast.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: "sqlite::memory:".to_string(),
        port: 0,
        jwt_secret: "integration-test-secret".to_string(),
        token_ttl: Duration::from_secs(60 * 60),
        starting_credits: 1000,
        history_window: 50,
        bcrypt_cost: 4,
    }
}

/// Create a migrated in-memory pool
pub async fn create_test_pool(config: &ServerConfig) -> SqlitePool {
    load_database(config)
        .await
        .expect("Failed to create test database pool")
}

/// Test database fixture
pub struct TestDatabase {
    pool: SqlitePool,
    config: ServerConfig,
    _dir: Option<TempDir>,
}

impl TestDatabase {
    /// Create a new test database fixture
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: ServerConfig) -> Self {
        let pool = create_test_pool(&config).await;
        Self {
            pool,
            config,
            _dir: None,
        }
    }

    /// File-backed database with a full connection pool; removed on drop
    pub async fn on_disk() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = ServerConfig {
            database_url: format!("sqlite://{}?mode=rwc", dir.path().join("boosty.db").display()),
            ..test_config()
        };
        let pool = create_test_pool(&config).await;
        Self {
            pool,
            config,
            _dir: Some(dir),
        }
    }

    /// Get the database pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Application state over this database
    pub fn state(&self) -> AppState {
        AppState::new(self.pool.clone(), self.config.clone())
    }
}
