/**
 * Backend Error Types
 *
 * One taxonomy for every failure the API and the relay can report.
 *
 * # Error Categories
 *
 * ## Domain errors
 *
 * Detected before any mutation and reported to the caller as-is:
 * - `NotFound` - a referenced account, creator, tier, post or recipient is missing
 * - `InsufficientFunds` - the buyer cannot afford the tier
 * - `AlreadyPurchased` - the tier is already in the buyer's entitlement set
 * - `Unauthenticated` - missing, malformed or expired token; bad credentials
 * - `Forbidden` - the actor does not own the resource it tries to change
 * - `Conflict` - a unique field (username, email) is taken
 * - `SharedError` - missing or malformed input field
 *
 * ## Infrastructure errors
 *
 * Storage, token signing and password hashing failures. They map to 500 and
 * their details are logged, never sent to the client.
 */

use std::fmt;

use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::SharedError;

/// Kind of record a `NotFound` refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Account,
    Creator,
    Tier,
    Post,
    Recipient,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Account => "Account",
            Self::Creator => "Subscription creator",
            Self::Tier => "Subscription",
            Self::Post => "Post",
            Self::Recipient => "Recipient",
        };
        f.write_str(name)
    }
}

/// Backend error taxonomy
///
/// ```rust
/// use boosty::backend::error::{BackendError, Entity};
/// use axum::http::StatusCode;
///
/// let err = BackendError::not_found(Entity::Tier);
/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{entity} not found")]
    NotFound { entity: Entity },

    #[error("Insufficient credits: balance {balance}, price {price}")]
    InsufficientFunds { balance: i64, price: i64 },

    #[error("Subscription already purchased")]
    AlreadyPurchased,

    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Input validation error from the shared module
    #[error(transparent)]
    SharedError(#[from] SharedError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),
}

impl BackendError {
    pub fn not_found(entity: Entity) -> Self {
        Self::NotFound { entity }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Shorthand for a field validation failure
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SharedError(SharedError::validation(field, message))
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InsufficientFunds { .. } => StatusCode::BAD_REQUEST,
            Self::AlreadyPurchased => StatusCode::CONFLICT,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::SharedError(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Token(_) | Self::PasswordHash(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::AlreadyPurchased => "already_purchased",
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden { .. } => "forbidden",
            Self::Conflict { .. } => "conflict",
            Self::SharedError(_) => "validation_error",
            Self::Database(_) | Self::Token(_) | Self::PasswordHash(_) => "internal",
        }
    }

    /// Message that is safe to show to a client
    pub fn message(&self) -> String {
        match self {
            Self::Database(_) | Self::Token(_) | Self::PasswordHash(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn is_internal(&self) -> bool {
        self.status_code().is_server_error()
    }
}
