/**
 * Post, Like and Comment Handlers
 *
 * Reads go through the viewer's entitlements: a gated post the viewer has
 * not bought comes back with `locked: true` and no content or media.
 * Entitlements are loaded fresh on every request.
 *
 * A post may only be gated by a tier its own author sells.
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::content::comments::{create_comment, list_comments};
use crate::backend::content::posts::{
    create_post, delete_post, get_post_author, list_accessible_posts,
    list_posts_by_author, toggle_like, update_post, PostChanges, PostDraft, MAX_MEDIA,
};
use crate::backend::error::{BackendError, Entity};
use crate::backend::extract::{ApiJson, ApiPath};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::backend::subscription::db::{get_tier, list_purchased_tiers};
use crate::backend::subscription::handlers::MessageResponse;
use crate::shared::access::Entitlements;
use crate::shared::error::required;
use crate::shared::models::{Comment, Post};

/// Posts returned by the feed
const FEED_LIMIT: i64 = 10;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    /// Gate tier; absent or empty for an open post
    #[serde(default)]
    pub tier_id: Option<String>,
    #[serde(default)]
    pub media: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    /// Empty string removes the gate; absent keeps it
    pub tier_id: Option<String>,
    pub media: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub post_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikesResponse {
    pub likes: Vec<Uuid>,
}

/// Current entitlements of a viewer
pub async fn viewer_entitlements(
    state: &AppState,
    viewer_id: Uuid,
) -> Result<Entitlements, BackendError> {
    let purchased = list_purchased_tiers(&state.pool, viewer_id).await?;
    Ok(Entitlements::new(viewer_id, purchased.into_iter().map(|t| t.id)))
}

fn parse_id(raw: &str, field: &str) -> Result<Uuid, BackendError> {
    Uuid::parse_str(raw.trim()).map_err(|_| BackendError::validation(field, "is not a valid id"))
}

fn parse_gate(raw: Option<String>) -> Result<Option<Uuid>, BackendError> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => parse_id(&raw, "tierId").map(Some),
        _ => Ok(None),
    }
}

fn check_media(media: &[String]) -> Result<(), BackendError> {
    if media.len() > MAX_MEDIA {
        return Err(BackendError::validation(
            "media",
            format!("at most {MAX_MEDIA} items are allowed"),
        ));
    }
    Ok(())
}

/// The gate must be an existing tier sold by the post's author
async fn check_gate(state: &AppState, author_id: Uuid, tier_id: Uuid) -> Result<(), BackendError> {
    let tier = get_tier(&state.pool, tier_id)
        .await?
        .ok_or_else(|| BackendError::not_found(Entity::Tier))?;
    if tier.creator_id != author_id {
        return Err(BackendError::forbidden(
            "Posts can only be gated by your own subscriptions",
        ));
    }
    Ok(())
}

async fn owned_post(state: &AppState, post_id: Uuid, actor: Uuid) -> Result<(), BackendError> {
    let author = get_post_author(&state.pool, post_id)
        .await?
        .ok_or_else(|| BackendError::not_found(Entity::Post))?;
    if author != actor {
        tracing::warn!("Account {} tried to modify post {} by {}", actor, post_id, author);
        return Err(BackendError::forbidden("Only the author can change this post"));
    }
    Ok(())
}

/// POST /api/posts
pub async fn create_post_handler(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(request): ApiJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), BackendError> {
    let title = required(request.title, "title")?;
    let content = required(request.content, "content")?;
    let tier_id = parse_gate(request.tier_id)?;
    check_media(&request.media)?;

    if let Some(tier_id) = tier_id {
        check_gate(&state, user.id(), tier_id).await?;
    }

    let draft = PostDraft {
        title,
        content,
        tier_id,
        media: request.media,
    };
    let post = create_post(&state.pool, user.id(), &draft).await?;
    tracing::info!("Post {} created by {}", post.id, user.id());

    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /api/posts
pub async fn list_own_posts(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Post>>, BackendError> {
    Ok(Json(list_posts_by_author(&state.pool, user.id()).await?))
}

/// GET /api/users/{id}/posts
pub async fn list_user_posts(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(author_id): ApiPath<Uuid>,
) -> Result<Json<Vec<Post>>, BackendError> {
    let viewer = viewer_entitlements(&state, user.id()).await?;
    let posts = list_posts_by_author(&state.pool, author_id).await?;

    Ok(Json(posts.into_iter().map(|p| viewer.apply(p)).collect()))
}

/// GET /api/posts/feed
pub async fn feed(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Post>>, BackendError> {
    let viewer = viewer_entitlements(&state, user.id()).await?;
    let posts = list_accessible_posts(&state.pool, user.id(), FEED_LIMIT).await?;

    Ok(Json(posts.into_iter().map(|p| viewer.apply(p)).collect()))
}

/// PUT /api/posts/{id}
pub async fn update_post_handler(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(post_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdatePostRequest>,
) -> Result<Json<Post>, BackendError> {
    owned_post(&state, post_id, user.id()).await?;

    let tier_id = match request.tier_id {
        None => None,
        Some(raw) => Some(parse_gate(Some(raw))?),
    };
    if let Some(Some(tier_id)) = tier_id {
        check_gate(&state, user.id(), tier_id).await?;
    }
    if let Some(media) = &request.media {
        check_media(media)?;
    }

    let changes = PostChanges {
        title: request.title.filter(|t| !t.trim().is_empty()),
        content: request.content.filter(|c| !c.trim().is_empty()),
        tier_id,
        media: request.media,
    };

    let post = update_post(&state.pool, post_id, &changes)
        .await?
        .ok_or_else(|| BackendError::not_found(Entity::Post))?;
    tracing::info!("Post {} updated", post_id);

    Ok(Json(post))
}

/// DELETE /api/posts/{id}
pub async fn delete_post_handler(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(post_id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, BackendError> {
    owned_post(&state, post_id, user.id()).await?;

    if !delete_post(&state.pool, post_id).await? {
        return Err(BackendError::not_found(Entity::Post));
    }
    tracing::info!("Post {} deleted", post_id);

    Ok(Json(MessageResponse {
        message: "Post deleted".to_string(),
    }))
}

/// POST /api/posts/{id}/like
pub async fn like_post(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(post_id): ApiPath<Uuid>,
) -> Result<Json<LikesResponse>, BackendError> {
    if get_post_author(&state.pool, post_id).await?.is_none() {
        return Err(BackendError::not_found(Entity::Post));
    }

    let likes = toggle_like(&state.pool, post_id, user.id()).await?;
    Ok(Json(LikesResponse { likes }))
}

/// POST /api/comments
pub async fn create_comment_handler(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(request): ApiJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), BackendError> {
    let content = required(request.content, "content")?;
    let post_id = parse_id(&required(request.post_id, "postId")?, "postId")?;

    if get_post_author(&state.pool, post_id).await?.is_none() {
        return Err(BackendError::not_found(Entity::Post));
    }

    let comment = create_comment(&state.pool, post_id, user.id(), &content).await?;
    tracing::debug!("Comment {} added to post {}", comment.id, post_id);

    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/posts/{id}/comments
pub async fn list_post_comments(
    State(state): State<AppState>,
    _user: AuthUser,
    ApiPath(post_id): ApiPath<Uuid>,
) -> Result<Json<Vec<Comment>>, BackendError> {
    if get_post_author(&state.pool, post_id).await?.is_none() {
        return Err(BackendError::not_found(Entity::Post));
    }
    Ok(Json(list_comments(&state.pool, post_id).await?))
}
