/**
 * Public Profile Handlers
 *
 * GET /api/users/random and GET /api/users/{id}. Both are public and never
 * expose a balance.
 */

use axum::{
    extract::State,
    response::Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::auth::users::{load_user_profile, random_accounts};
use crate::backend::error::{BackendError, Entity};
use crate::backend::extract::ApiPath;
use crate::backend::server::state::AppState;
use crate::shared::models::UserProfile;

const RANDOM_USERS: i64 = 3;

/// Profile card used by the discovery list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCard {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub description: String,
    pub avatar: String,
}

/// GET /api/users/random
pub async fn random_users(State(state): State<AppState>) -> Result<Json<Vec<UserCard>>, BackendError> {
    let accounts = random_accounts(&state.pool, RANDOM_USERS).await?;

    Ok(Json(
        accounts
            .into_iter()
            .map(|a| UserCard {
                id: a.id,
                username: a.username,
                email: a.email,
                description: a.description,
                avatar: a.avatar,
            })
            .collect(),
    ))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(account_id): ApiPath<Uuid>,
) -> Result<Json<UserProfile>, BackendError> {
    let profile = load_user_profile(&state.pool, account_id)
        .await?
        .ok_or_else(|| BackendError::not_found(Entity::Account))?;
    Ok(Json(profile))
}
