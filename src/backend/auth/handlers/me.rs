/**
 * Current Account Handler
 *
 * GET /api/auth/me returns the caller's own profile: balance included,
 * purchased tiers expanded.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::users::load_account_profile;
use crate::backend::error::{BackendError, Entity};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::models::AccountProfile;

pub async fn get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<AccountProfile>, BackendError> {
    let profile = load_account_profile(&state.pool, user.id())
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token for missing account: {}", user.id());
            BackendError::not_found(Entity::Account)
        })?;

    Ok(Json(profile))
}
