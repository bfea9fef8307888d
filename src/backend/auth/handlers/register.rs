/**
 * Register Handler
 *
 * POST /api/auth/register
 *
 * # Registration Process
 *
 * 1. Require username, email and password; check the email shape
 * 2. Hash the password with bcrypt (configured cost)
 * 3. Create the account with the starting balance
 * 4. Issue a token so the client is signed in right away
 *
 * Duplicate usernames and emails are rejected by the unique constraints and
 * reported as 409.
 */

use axum::{extract::State, http::StatusCode, response::Json};
use bcrypt::hash;

use crate::backend::auth::handlers::types::{
    account_conflict, validate_email, AuthResponse, RegisterRequest,
};
use crate::backend::auth::users::{create_account, load_account_profile};
use crate::backend::error::{BackendError, Entity};
use crate::backend::extract::ApiJson;
use crate::backend::server::state::AppState;
use crate::shared::error::required;

pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), BackendError> {
    let username = required(request.username, "username")?;
    let email = required(request.email, "email")?;
    let password = required(request.password, "password")?;
    let username = username.trim();
    let email = email.trim();
    validate_email(email)?;

    tracing::info!("Registration request for: {}", email);

    let password_hash = hash(&password, state.config.bcrypt_cost)?;

    let account = create_account(
        &state.pool,
        username,
        email,
        &password_hash,
        state.config.starting_credits,
    )
    .await
    .map_err(account_conflict)?;

    let token = state.keys.create_token(account.id, &account.email)?;
    let user = load_account_profile(&state.pool, account.id)
        .await?
        .ok_or_else(|| BackendError::not_found(Entity::Account))?;

    tracing::info!("Account registered: {} ({})", user.username, user.id);

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}
