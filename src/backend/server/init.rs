/**
 * Server Initialization
 *
 * # Initialization Process
 *
 * 1. Open the SQLite pool and run migrations (fatal on failure)
 * 2. Build the application state (session keys, engine, relay)
 * 3. Create the router
 */

use axum::Router;
use sqlx::SqlitePool;

use crate::backend::error::BackendError;
use crate::backend::routes::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
pub async fn create_app(config: &ServerConfig) -> Result<Router, BackendError> {
    tracing::info!("Initializing Boosty backend server");

    let pool = load_database(config).await?;
    let app = build_app(pool, config.clone());

    tracing::info!("Router configured");
    Ok(app)
}

/// Build the router on an already migrated pool
pub fn build_app(pool: SqlitePool, config: ServerConfig) -> Router {
    create_router(AppState::new(pool, config))
}
