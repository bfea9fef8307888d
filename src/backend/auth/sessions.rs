/**
 * Session Management and JWT Tokens
 *
 * Issues and checks the HS256 tokens carried by HTTP requests (Authorization
 * header) and by every relay frame (`token` field).
 *
 * Resolution is stateless: a token resolves to an account ID from its
 * signature and expiry alone. Whether that account still exists is checked
 * by whoever uses the ID.
 */

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::backend::error::BackendError;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account ID
    pub sub: String,
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Signing material and token lifetime
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl SessionKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Create a token for an account, valid for the configured TTL
    pub fn create_token(&self, account_id: Uuid, email: &str) -> Result<String, BackendError> {
        let now = Utc::now().timestamp().max(0) as u64;
        let claims = Claims {
            sub: account_id.to_string(),
            email: email.to_string(),
            iat: now,
            exp: now + self.ttl.as_secs(),
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, BackendError> {
        Ok(encode(&Header::new(Algorithm::HS256), claims, &self.encoding)?)
    }

    /// Verify signature and expiry, returning the claims
    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }

    /// Resolve a token to the account it was issued for.
    ///
    /// Accepts the bare token or a `Bearer <token>` value. Every failure
    /// (empty, malformed, bad signature, expired, bad subject) is reported as
    /// `Unauthenticated`.
    pub fn resolve(&self, token: &str) -> Result<Uuid, BackendError> {
        let token = token.trim();
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        if token.is_empty() {
            return Err(BackendError::Unauthenticated);
        }

        let claims = self.verify_token(token).map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            BackendError::Unauthenticated
        })?;

        Uuid::parse_str(&claims.sub).map_err(|_| {
            tracing::warn!("Token carries an invalid subject: {:?}", claims.sub);
            BackendError::Unauthenticated
        })
    }
}
