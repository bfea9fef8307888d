//! Backend Module
//!
//! All server-side code: the Axum HTTP API, the WebSocket messaging relay and
//! SQLite persistence. Only compiled with the `ssr` feature.
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Configuration, state, app creation
//! ├── routes/         - Router assembly
//! ├── auth/           - Accounts, sessions, auth and profile endpoints
//! ├── subscription/   - Tiers and the credit-transfer engine
//! ├── content/        - Posts, likes, comments
//! ├── messaging/      - Message store and history endpoints
//! ├── realtime/       - WebSocket relay
//! ├── middleware/     - Bearer-token authentication
//! ├── extract.rs      - JSON and path extractors with API rejections
//! └── error/          - BackendError and its conversions
//! ```
//!
//! # Shared Mutable State
//!
//! Account balances and the purchase relation are the only records written
//! concurrently by different actors. Purchases by one buyer are serialized by
//! a per-account lock and applied in a single transaction; see
//! `subscription::engine`.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and account management
pub mod auth;

/// Bearer-token middleware
pub mod middleware;

/// Extractors whose rejections use the API error body
pub mod extract;

/// Subscription tiers and purchases
pub mod subscription;

/// Posts, likes and comments
pub mod content;

/// Message history
pub mod messaging;

/// Real-time messaging relay
pub mod realtime;

pub use error::{BackendError, BackendResult};
pub use server::create_app;
