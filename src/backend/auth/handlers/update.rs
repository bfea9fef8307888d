/**
 * Profile Update Handler
 *
 * PUT /api/auth/update changes the caller's username, email, description,
 * avatar or cover. Blank values are ignored; the balance is never touched.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{
    account_conflict, validate_email, ProfileResponse, UpdateProfileRequest,
};
use crate::backend::auth::users::{load_account_profile, update_profile, ProfileChanges};
use crate::backend::error::{BackendError, Entity};
use crate::backend::extract::ApiJson;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, BackendError> {
    let changes = ProfileChanges {
        username: non_blank(request.username),
        email: non_blank(request.email),
        description: request.description,
        avatar: non_blank(request.avatar),
        cover: non_blank(request.cover),
    };
    if let Some(email) = &changes.email {
        validate_email(email)?;
    }

    update_profile(&state.pool, user.id(), &changes)
        .await
        .map_err(account_conflict)?
        .ok_or_else(|| BackendError::not_found(Entity::Account))?;

    let profile = load_account_profile(&state.pool, user.id())
        .await?
        .ok_or_else(|| BackendError::not_found(Entity::Account))?;

    tracing::info!("Profile updated: {}", profile.id);

    Ok(Json(ProfileResponse {
        message: "Profile updated".to_string(),
        user: profile,
    }))
}
