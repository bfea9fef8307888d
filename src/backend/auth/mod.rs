//! Authentication Module
//!
//! Accounts, sessions and the auth endpoints.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - Account model and database operations
//! ├── sessions.rs     - JWT issue and resolution
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Security
//!
//! - Passwords are hashed with bcrypt before storage
//! - Tokens are HS256 JWTs with a fixed validity window (1 hour by default)
//! - Bad credentials and bad tokens both return 401

/// Account model and database operations
pub mod users;

/// JWT token generation and resolution
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::{get_me, get_user, login, random_users, register, update_me};
pub use sessions::SessionKeys;
