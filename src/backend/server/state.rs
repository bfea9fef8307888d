/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` holds:
 * - the SQLite pool shared by every store
 * - the session keys that resolve bearer tokens
 * - the credit-transfer engine (with its per-account locks)
 * - the messaging relay (connection registry and publish lock)
 * - the loaded configuration
 *
 * Everything is cheap to clone: pools, keys and the relay are reference
 * counted internally.
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::backend::auth::sessions::SessionKeys;
use crate::backend::realtime::Relay;
use crate::backend::server::config::ServerConfig;
use crate::backend::subscription::engine::{AccountLocks, CreditTransferEngine};

/// Central state container for the Axum application
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub keys: SessionKeys,
    pub engine: CreditTransferEngine,
    pub relay: Relay,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: ServerConfig) -> Self {
        let keys = SessionKeys::new(&config.jwt_secret, config.token_ttl);
        let engine = CreditTransferEngine::new(pool.clone(), AccountLocks::new());
        let relay = Relay::new(pool.clone(), keys.clone());

        Self {
            pool,
            keys,
            engine,
            relay,
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.pool.clone()
    }
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.keys.clone()
    }
}

impl FromRef<AppState> for CreditTransferEngine {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.engine.clone()
    }
}

impl FromRef<AppState> for Relay {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.relay.clone()
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
