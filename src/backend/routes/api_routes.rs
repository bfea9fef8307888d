/**
 * API Route Handlers
 *
 * # Routes
 *
 * ## Public
 * - `POST /api/auth/register`, `POST /api/auth/login`
 * - `GET /api/users/random`, `GET /api/users/{id}`,
 *   `GET /api/users/{id}/subscriptions`
 *
 * ## Authenticated (Bearer token)
 * - `GET /api/auth/me`, `PUT /api/auth/update`
 * - `POST|GET /api/subscriptions`, `GET /api/subscriptions/purchased`,
 *   `PUT|DELETE /api/subscriptions/{id}`, `POST /api/subscriptions/{id}/purchase`
 * - `POST|GET /api/posts`, `GET /api/posts/feed`, `PUT|DELETE /api/posts/{id}`,
 *   `POST /api/posts/{id}/like`, `GET /api/posts/{id}/comments`,
 *   `GET /api/users/{id}/posts`
 * - `POST /api/comments`
 * - `GET /api/dialogs`, `GET /api/messages`, `GET /api/messages/{id}`
 */

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::backend::auth::{get_me, get_user, login, random_users, register, update_me};
use crate::backend::content::handlers::{
    create_comment_handler, create_post_handler, delete_post_handler, feed, like_post,
    list_own_posts, list_post_comments, list_user_posts, update_post_handler,
};
use crate::backend::messaging::{dialog_messages, list_dialogs, sent_messages};
use crate::backend::middleware::auth_middleware;
use crate::backend::server::state::AppState;
use crate::backend::subscription::handlers::{
    create_subscription, delete_subscription, list_own_subscriptions,
    list_purchased_subscriptions, list_user_subscriptions, purchase_subscription,
    update_subscription,
};

/// Routes that need no token
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/users/random", get(random_users))
        .route("/api/users/{id}", get(get_user))
        .route("/api/users/{id}/subscriptions", get(list_user_subscriptions))
}

/// Routes behind the auth middleware
pub fn protected_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/auth/me", get(get_me))
        .route("/api/auth/update", put(update_me))
        .route(
            "/api/subscriptions",
            post(create_subscription).get(list_own_subscriptions),
        )
        .route(
            "/api/subscriptions/purchased",
            get(list_purchased_subscriptions),
        )
        .route(
            "/api/subscriptions/{id}",
            put(update_subscription).delete(delete_subscription),
        )
        .route(
            "/api/subscriptions/{id}/purchase",
            post(purchase_subscription),
        )
        .route("/api/posts", post(create_post_handler).get(list_own_posts))
        .route("/api/posts/feed", get(feed))
        .route(
            "/api/posts/{id}",
            put(update_post_handler).delete(delete_post_handler),
        )
        .route("/api/posts/{id}/like", post(like_post))
        .route("/api/posts/{id}/comments", get(list_post_comments))
        .route("/api/users/{id}/posts", get(list_user_posts))
        .route("/api/comments", post(create_comment_handler))
        .route("/api/dialogs", get(list_dialogs))
        .route("/api/messages", get(sent_messages))
        .route("/api/messages/{id}", get(dialog_messages))
        .route_layer(middleware::from_fn_with_state(app_state, auth_middleware))
}

/// Add all API routes to a router
pub fn configure_api_routes(router: Router<AppState>, app_state: AppState) -> Router<AppState> {
    router
        .merge(public_routes())
        .merge(protected_routes(app_state))
}
