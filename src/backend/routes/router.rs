/**
 * Router Configuration
 *
 * Combines the relay endpoints, the API routes and the health check into one
 * router, wrapped in request tracing and CORS.
 *
 * # Routes
 *
 * - `GET /`, `GET /ws` - Messaging relay (WebSocket upgrade)
 * - `GET /ping` - Liveness, returns `OK`
 * - `/api/...` - see `api_routes`
 */

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::backend::realtime::relay_upgrade;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new()
        .route("/", get(relay_upgrade))
        .route("/ws", get(relay_upgrade))
        .route("/ping", get(|| async { "OK" }));

    let router = configure_api_routes(router, app_state.clone());

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state)
}
