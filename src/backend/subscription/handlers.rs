//! HTTP handlers for subscription tiers
//!
//! Tier management is creator-only: editing or deleting someone else's tier
//! is `Forbidden`. Purchases go through the credit-transfer engine.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::backend::auth::handlers::ProfileResponse;
use crate::backend::auth::users::account_exists;
use crate::backend::error::{BackendError, Entity};
use crate::backend::extract::{ApiJson, ApiPath};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::backend::subscription::db::{
    create_tier, delete_tier, get_tier, list_creator_tiers, list_purchased_with_creators,
    update_tier, TierChanges, TierDeletion, TierDraft,
};
use crate::shared::error::required;
use crate::shared::models::{PurchasedTier, SubscriptionTier};

#[derive(Debug, Default, Deserialize)]
pub struct CreateTierRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTierRequest {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, serde::Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

fn check_price(price: i64) -> Result<i64, BackendError> {
    if price < 0 {
        return Err(BackendError::validation("price", "must not be negative"));
    }
    Ok(price)
}

/// Load a tier and make sure `actor` created it
async fn owned_tier(
    state: &AppState,
    tier_id: Uuid,
    actor: Uuid,
) -> Result<SubscriptionTier, BackendError> {
    let tier = get_tier(&state.pool, tier_id)
        .await?
        .ok_or_else(|| BackendError::not_found(Entity::Tier))?;

    if tier.creator_id != actor {
        tracing::warn!(
            "Account {} tried to modify tier {} owned by {}",
            actor,
            tier_id,
            tier.creator_id
        );
        return Err(BackendError::forbidden("Only the creator can change this subscription"));
    }
    Ok(tier)
}

/// POST /api/subscriptions
pub async fn create_subscription(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(request): ApiJson<CreateTierRequest>,
) -> Result<(StatusCode, Json<SubscriptionTier>), BackendError> {
    let name = required(request.name, "name")?;
    let price = request
        .price
        .ok_or_else(|| BackendError::validation("price", "is required"))?;

    let draft = TierDraft {
        name: name.trim().to_string(),
        price: check_price(price)?,
        description: request.description.unwrap_or_default(),
        image: request.image.filter(|i| !i.trim().is_empty()),
    };

    let tier = create_tier(&state.pool, user.id(), &draft).await?;
    tracing::info!("Tier {} created by {} at {} credits", tier.id, user.id(), tier.price);

    Ok((StatusCode::CREATED, Json(tier)))
}

/// GET /api/subscriptions
pub async fn list_own_subscriptions(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<SubscriptionTier>>, BackendError> {
    Ok(Json(list_creator_tiers(&state.pool, user.id()).await?))
}

/// GET /api/users/{id}/subscriptions
pub async fn list_user_subscriptions(
    State(state): State<AppState>,
    ApiPath(creator_id): ApiPath<Uuid>,
) -> Result<Json<Vec<SubscriptionTier>>, BackendError> {
    Ok(Json(list_creator_tiers(&state.pool, creator_id).await?))
}

/// GET /api/subscriptions/purchased
pub async fn list_purchased_subscriptions(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<PurchasedTier>>, BackendError> {
    if !account_exists(&state.pool, user.id()).await? {
        return Err(BackendError::not_found(Entity::Account));
    }
    Ok(Json(list_purchased_with_creators(&state.pool, user.id()).await?))
}

/// PUT /api/subscriptions/{id}
pub async fn update_subscription(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(tier_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateTierRequest>,
) -> Result<Json<SubscriptionTier>, BackendError> {
    owned_tier(&state, tier_id, user.id()).await?;

    let changes = TierChanges {
        name: request
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        price: request.price.map(check_price).transpose()?,
        description: request.description,
        image: request.image.filter(|i| !i.trim().is_empty()),
    };

    let tier = update_tier(&state.pool, tier_id, &changes)
        .await?
        .ok_or_else(|| BackendError::not_found(Entity::Tier))?;
    tracing::info!("Tier {} updated", tier_id);

    Ok(Json(tier))
}

/// DELETE /api/subscriptions/{id}
///
/// Refused while posts are gated by the tier. Entitlements to the tier are
/// removed with it.
pub async fn delete_subscription(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(tier_id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, BackendError> {
    owned_tier(&state, tier_id, user.id()).await?;

    match delete_tier(&state.pool, tier_id).await? {
        TierDeletion::Deleted => {}
        TierDeletion::Gated(gated) => {
            return Err(BackendError::conflict(format!(
                "Subscription still gates {gated} post(s)"
            )));
        }
        TierDeletion::Missing => return Err(BackendError::not_found(Entity::Tier)),
    }
    tracing::info!("Tier {} deleted", tier_id);

    Ok(Json(MessageResponse {
        message: "Subscription deleted".to_string(),
    }))
}

/// POST /api/subscriptions/{id}/purchase
pub async fn purchase_subscription(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(tier_id): ApiPath<Uuid>,
) -> Result<Json<ProfileResponse>, BackendError> {
    let profile = state.engine.purchase(user.id(), tier_id).await?;

    Ok(Json(ProfileResponse {
        message: "Subscription purchased".to_string(),
        user: profile,
    }))
}
