//! Authentication Handlers Module
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports and documentation
//! ├── types.rs    - Request and response types, input checks
//! ├── register.rs - Account registration
//! ├── login.rs    - Credential check and token issue
//! ├── me.rs       - Current account profile
//! ├── update.rs   - Profile update
//! └── profiles.rs - Public profiles
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /api/auth/register
//! - **`login`** - POST /api/auth/login
//! - **`get_me`** - GET /api/auth/me
//! - **`update_me`** - PUT /api/auth/update
//! - **`random_users`**, **`get_user`** - GET /api/users/random, GET /api/users/{id}

/// Request and response types
pub mod types;

pub mod register;

pub mod login;

pub mod me;

pub mod update;

pub mod profiles;

pub use types::{AuthResponse, LoginRequest, ProfileResponse, RegisterRequest, UpdateProfileRequest};

pub use login::login;
pub use me::get_me;
pub use profiles::{get_user, random_users};
pub use register::register;
pub use update::update_me;
