//! Messaging HTTP Handlers
//!
//! Read-only history. Messages are written by the relay only.

use axum::{
    extract::State,
    Json,
};
use uuid::Uuid;

use super::db;
use crate::backend::auth::users::account_exists;
use crate::backend::error::{BackendError, Entity};
use crate::backend::extract::ApiPath;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::models::{ChatMessage, DialogSummary};

/// GET /api/dialogs
pub async fn list_dialogs(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<DialogSummary>>, BackendError> {
    Ok(Json(db::list_dialogs(&state.pool, user.id()).await?))
}

/// GET /api/messages/{id}
pub async fn dialog_messages(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(counterpart): ApiPath<Uuid>,
) -> Result<Json<Vec<ChatMessage>>, BackendError> {
    if !account_exists(&state.pool, counterpart).await? {
        return Err(BackendError::not_found(Entity::Recipient));
    }

    let messages = db::dialog_window(
        &state.pool,
        user.id(),
        counterpart,
        state.config.history_window,
    )
    .await?;
    Ok(Json(messages))
}

/// GET /api/messages
pub async fn sent_messages(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ChatMessage>>, BackendError> {
    let messages = db::list_sent(&state.pool, user.id(), state.config.history_window).await?;
    Ok(Json(messages))
}
