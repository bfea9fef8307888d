//! Boosty - Main Library
//!
//! Backend for a creator-subscription platform: creators publish posts that may
//! be gated behind paid tiers, readers buy tiers with an internal credit
//! balance, and everyone can exchange direct messages over a WebSocket relay.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between server and clients
//!   - API records, relay wire format, input errors
//!   - The pure access predicate for gated posts
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP API and WebSocket relay on one listener
//!   - Credit-transfer engine for tier purchases
//!   - SQLite persistence through sqlx
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - enables the backend modules and the server binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use boosty::backend::server::{config::ServerConfig, init::create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(&config).await?;
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! Server state is shared through `Arc`s: the sqlx pool, the per-account
//! purchase locks and the relay's connection registry are all `Send + Sync`.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
