//! Route Configuration Module
//!
//! ```text
//! routes/
//! ├── mod.rs        - Module exports
//! ├── router.rs     - Main router creation
//! └── api_routes.rs - JSON API routes (public and authenticated)
//! ```

pub mod api_routes;
pub mod router;

pub use router::create_router;
