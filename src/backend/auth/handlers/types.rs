/**
 * Authentication Handler Types
 *
 * Request and response bodies for the auth endpoints, plus the input checks
 * they share.
 */

use serde::{Deserialize, Serialize};

use crate::backend::error::BackendError;
use crate::shared::models::AccountProfile;

/// Registration request
///
/// Fields are optional on the wire so a missing one is reported as a
/// validation error naming it.
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Profile update; absent fields are left unchanged
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub cover: Option<String>,
}

/// Returned by register and login
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub token: String,
    pub user: AccountProfile,
}

/// A confirmation message together with the refreshed profile
#[derive(Serialize, Deserialize, Debug)]
pub struct ProfileResponse {
    pub message: String,
    pub user: AccountProfile,
}

/// Basic email shape check: `local@domain.tld`, no whitespace, one `@`
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

pub fn validate_email(email: &str) -> Result<(), BackendError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(BackendError::validation("email", "is not a valid email address"))
    }
}

/// Map a unique-constraint violation on accounts to `Conflict`
pub fn account_conflict(error: sqlx::Error) -> BackendError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            let message = if db.message().contains("email") {
                "Email is already registered"
            } else {
                "Username is already taken"
            };
            BackendError::conflict(message)
        }
        _ => error.into(),
    }
}
