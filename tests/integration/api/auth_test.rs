//! Authentication API integration tests
//!
//! Tests for registration, login, the caller's profile and public profiles.

use axum::http::StatusCode;
use boosty::backend::auth::handlers::AuthResponse;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use super::{bearer, create_test_server};
use crate::common::{create_test_user, TestDatabase};

#[tokio::test]
async fn test_register_success() {
    let db = TestDatabase::new().await;
    let server = create_test_server(&db);

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "password123"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: AuthResponse = response.json();
    assert!(!body.token.is_empty());
    assert_eq!(body.user.username, "alice");
    assert_eq!(body.user.credits, db.config().starting_credits);
    assert!(body.user.purchased_subscriptions.is_empty());
}

#[tokio::test]
async fn test_register_does_not_leak_password_hash() {
    let db = TestDatabase::new().await;
    let server = create_test_server(&db);

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "password123"
        }))
        .await;

    assert_contains!(response.text(), "alice@example.com");
    assert!(!response.text().contains("password"));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let db = TestDatabase::new().await;
    let server = create_test_server(&db);
    create_test_user(db.pool(), &db.state().keys, "alice", 0).await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "username": "someone_else",
            "email": "alice@example.com",
            "password": "password123"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_missing_fields() {
    let db = TestDatabase::new().await;
    let server = create_test_server(&db);

    let response = server
        .post("/api/auth/register")
        .json(&json!({ "username": "alice", "email": "alice@example.com" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_contains!(body["error"].as_str().unwrap(), "password");
}

#[tokio::test]
async fn test_register_invalid_email() {
    let db = TestDatabase::new().await;
    let server = create_test_server(&db);

    let response = server
        .post("/api/auth/register")
        .json(&json!({ "username": "alice", "email": "not-an-email", "password": "pw" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_success() {
    let db = TestDatabase::new().await;
    let server = create_test_server(&db);
    let user = create_test_user(db.pool(), &db.state().keys, "alice", 42).await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": user.email, "password": user.password }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: AuthResponse = response.json();
    assert_eq!(body.user.id, user.id);
    assert_eq!(body.user.credits, 42);

    // The issued token works on protected routes
    let (name, value) = bearer(&body.token);
    let me = server.get("/api/auth/me").add_header(name, value).await;
    assert_eq!(me.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let db = TestDatabase::new().await;
    let server = create_test_server(&db);
    let user = create_test_user(db.pool(), &db.state().keys, "alice", 0).await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": user.email, "password": "wrong_password" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_unknown_email() {
    let db = TestDatabase::new().await;
    let server = create_test_server(&db);

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "nobody@example.com", "password": "whatever" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_requires_token() {
    let db = TestDatabase::new().await;
    let server = create_test_server(&db);

    let response = server.get("/api/auth/me").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let (name, value) = bearer("not-a-token");
    let response = server.get("/api/auth/me").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["kind"], "unauthenticated");
}

#[tokio::test]
async fn test_me_returns_profile() {
    let db = TestDatabase::new().await;
    let server = create_test_server(&db);
    let user = create_test_user(db.pool(), &db.state().keys, "alice", 7).await;

    let (name, value) = bearer(&user.token);
    let response = server.get("/api/auth/me").add_header(name, value).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["username"], "alice");
    assert_eq!(body["credits"], 7);
    assert_eq!(body["purchasedSubscriptions"], json!([]));
}

#[tokio::test]
async fn test_update_profile() {
    let db = TestDatabase::new().await;
    let server = create_test_server(&db);
    let user = create_test_user(db.pool(), &db.state().keys, "alice", 7).await;

    let (name, value) = bearer(&user.token);
    let response = server
        .put("/api/auth/update")
        .add_header(name, value)
        .json(&json!({ "description": "I draw things", "username": "" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Profile updated");
    assert_eq!(body["user"]["description"], "I draw things");
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["credits"], 7);
}

#[tokio::test]
async fn test_update_profile_username_taken() {
    let db = TestDatabase::new().await;
    let server = create_test_server(&db);
    let keys = db.state().keys;
    let alice = create_test_user(db.pool(), &keys, "alice", 0).await;
    create_test_user(db.pool(), &keys, "bob", 0).await;

    let (name, value) = bearer(&alice.token);
    let response = server
        .put("/api/auth/update")
        .add_header(name, value)
        .json(&json!({ "username": "bob" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_public_profiles() {
    let db = TestDatabase::new().await;
    let server = create_test_server(&db);
    let keys = db.state().keys;
    let alice = create_test_user(db.pool(), &keys, "alice", 0).await;
    for name in ["bob", "carol", "dave"] {
        create_test_user(db.pool(), &keys, name, 0).await;
    }

    let random = server.get("/api/users/random").await;
    assert_eq!(random.status_code(), StatusCode::OK);
    let cards: Vec<Value> = random.json();
    assert_eq!(cards.len(), 3);

    let profile = server.get(&format!("/api/users/{}", alice.id)).await;
    assert_eq!(profile.status_code(), StatusCode::OK);
    let body: Value = profile.json();
    assert_eq!(body["username"], "alice");
    assert!(body.get("credits").is_none());

    let missing = server.get(&format!("/api/users/{}", Uuid::new_v4())).await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_token_outliving_account_reaches_handler() {
    let db = TestDatabase::new().await;
    let server = create_test_server(&db);
    let user = create_test_user(db.pool(), &db.state().keys, "gone", 0).await;

    sqlx::query("DELETE FROM accounts WHERE id = $1")
        .bind(user.id)
        .execute(db.pool())
        .await
        .unwrap();

    // The middleware accepts the token; the handler finds no account
    let (name, value) = bearer(&user.token);
    let response = server.get("/api/auth/me").add_header(name, value).await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["kind"], "not_found");
}
