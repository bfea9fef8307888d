/**
 * Authentication Middleware
 *
 * Protects routes that require a signed-in account. The bearer token from the
 * Authorization header is resolved to an account ID and attached to the
 * request extensions for handlers to pick up through `AuthUser`.
 *
 * The account itself is not loaded here; handlers that need it report
 * `NotFound(account)` when it is gone.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Account resolved from the request's token
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub account_id: Uuid,
}

/// Authentication middleware
///
/// Returns 401 when the header is missing, not a Bearer value, or the token
/// does not resolve.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            BackendError::Unauthenticated
        })?;

    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("Invalid Authorization header format");
        BackendError::Unauthenticated
    })?;

    let account_id = app_state.keys.resolve(token)?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser { account_id });

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated account
#[derive(Clone, Copy, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl AuthUser {
    pub fn id(&self) -> Uuid {
        self.0.account_id
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .map(AuthUser)
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::Unauthenticated
            })
    }
}
