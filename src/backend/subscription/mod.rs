//! Subscription Module
//!
//! Creator tiers and the credit-transfer engine that sells them.
//!
//! # Module Structure
//!
//! ```text
//! subscription/
//! ├── mod.rs      - Module exports
//! ├── db.rs       - Tier store and purchased-tier reads
//! ├── engine.rs   - Credit-transfer engine and per-account locks
//! └── handlers.rs - HTTP handlers
//! ```

pub mod db;
pub mod engine;
pub mod handlers;

pub use engine::{AccountLocks, CreditTransferEngine};
