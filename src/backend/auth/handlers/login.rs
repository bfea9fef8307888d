/**
 * Login Handler
 *
 * POST /api/auth/login
 *
 * Unknown email and wrong password are both reported as 401 with the same
 * message, so the endpoint does not reveal which accounts exist.
 */

use axum::{extract::State, response::Json};
use bcrypt::verify;

use crate::backend::auth::handlers::types::{validate_email, AuthResponse, LoginRequest};
use crate::backend::auth::users::{get_account_by_email, load_account_profile};
use crate::backend::error::{BackendError, Entity};
use crate::backend::extract::ApiJson;
use crate::backend::server::state::AppState;
use crate::shared::error::required;

pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    let email = required(request.email, "email")?;
    let password = required(request.password, "password")?;
    let email = email.trim();
    validate_email(email)?;

    let account = get_account_by_email(&state.pool, email)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Login for unknown email: {}", email);
            BackendError::Unauthenticated
        })?;

    if !verify(&password, &account.password_hash)? {
        tracing::warn!("Invalid password for account: {}", account.id);
        return Err(BackendError::Unauthenticated);
    }

    let token = state.keys.create_token(account.id, &account.email)?;
    let user = load_account_profile(&state.pool, account.id)
        .await?
        .ok_or_else(|| BackendError::not_found(Entity::Account))?;

    tracing::info!("Account logged in: {} ({})", user.username, user.id);

    Ok(Json(AuthResponse { token, user }))
}
