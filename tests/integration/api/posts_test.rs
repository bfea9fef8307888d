//! Post, like and comment API integration tests

use axum::http::StatusCode;
use boosty::shared::models::{Comment, Post};
use serde_json::{json, Value};
use uuid::Uuid;

use super::{bearer, create_test_server};
use crate::common::{create_test_tier, create_test_user, TestDatabase, TestUser};
use axum_test::TestServer;

async fn publish(server: &TestServer, author: &TestUser, body: Value) -> Post {
    let (name, value) = bearer(&author.token);
    let response = server.post("/api/posts").add_header(name, value).json(&body).await;
    assert_eq!(response.status_code(), StatusCode::CREATED, "{}", response.text());
    response.json()
}

async fn posts_of(server: &TestServer, viewer: &TestUser, author: &TestUser) -> Vec<Post> {
    let (name, value) = bearer(&viewer.token);
    server
        .get(&format!("/api/users/{}/posts", author.id))
        .add_header(name, value)
        .await
        .json()
}

#[tokio::test]
async fn test_gated_post_is_redacted_until_purchase() {
    let db = TestDatabase::new().await;
    let server = create_test_server(&db);
    let state = db.state();
    let creator = create_test_user(db.pool(), &state.keys, "creator", 0).await;
    let fan = create_test_user(db.pool(), &state.keys, "fan", 100).await;
    let tier = create_test_tier(db.pool(), creator.id, 20).await;

    publish(
        &server,
        &creator,
        json!({ "title": "Open", "content": "For everyone" }),
    )
    .await;
    let gated = publish(
        &server,
        &creator,
        json!({
            "title": "Gated",
            "content": "For fans",
            "tierId": tier.id,
            "media": ["https://img.example.com/1.png"]
        }),
    )
    .await;
    assert_eq!(gated.gate(), Some(tier.id));

    let before = posts_of(&server, &fan, &creator).await;
    let locked = before.iter().find(|p| p.id == gated.id).unwrap();
    assert!(locked.locked);
    assert_eq!(locked.title, "Gated");
    assert!(locked.content.is_empty());
    assert!(locked.media.is_empty());
    let open = before.iter().find(|p| p.title == "Open").unwrap();
    assert!(!open.locked);
    assert_eq!(open.content, "For everyone");

    // The author always sees their own posts in full
    let own = posts_of(&server, &creator, &creator).await;
    assert!(own.iter().all(|p| !p.locked));

    state.engine.purchase(fan.id, tier.id).await.unwrap();

    let after = posts_of(&server, &fan, &creator).await;
    let unlocked = after.iter().find(|p| p.id == gated.id).unwrap();
    assert!(!unlocked.locked);
    assert_eq!(unlocked.content, "For fans");
    assert_eq!(unlocked.media, vec!["https://img.example.com/1.png"]);
}

#[tokio::test]
async fn test_feed_only_lists_accessible_posts() {
    let db = TestDatabase::new().await;
    let server = create_test_server(&db);
    let state = db.state();
    let creator = create_test_user(db.pool(), &state.keys, "creator", 0).await;
    let fan = create_test_user(db.pool(), &state.keys, "fan", 100).await;
    let tier = create_test_tier(db.pool(), creator.id, 20).await;

    publish(&server, &creator, json!({ "title": "Open", "content": "a" })).await;
    publish(
        &server,
        &creator,
        json!({ "title": "Gated", "content": "b", "tierId": tier.id }),
    )
    .await;

    let (name, value) = bearer(&fan.token);
    let feed: Vec<Post> = server
        .get("/api/posts/feed")
        .add_header(name.clone(), value.clone())
        .await
        .json();
    let titles: Vec<&str> = feed.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Open"]);

    state.engine.purchase(fan.id, tier.id).await.unwrap();

    let feed: Vec<Post> = server.get("/api/posts/feed").add_header(name, value).await.json();
    assert_eq!(feed.len(), 2);
    assert!(feed.iter().all(|p| !p.locked));
}

#[tokio::test]
async fn test_cannot_gate_with_foreign_tier() {
    let db = TestDatabase::new().await;
    let server = create_test_server(&db);
    let keys = db.state().keys;
    let creator = create_test_user(db.pool(), &keys, "creator", 0).await;
    let other = create_test_user(db.pool(), &keys, "other", 0).await;
    let tier = create_test_tier(db.pool(), creator.id, 20).await;

    let (name, value) = bearer(&other.token);
    let foreign = server
        .post("/api/posts")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "title": "Mine", "content": "x", "tierId": tier.id }))
        .await;
    assert_eq!(foreign.status_code(), StatusCode::FORBIDDEN);

    let unknown = server
        .post("/api/posts")
        .add_header(name, value)
        .json(&json!({ "title": "Mine", "content": "x", "tierId": Uuid::new_v4() }))
        .await;
    assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_validation() {
    let db = TestDatabase::new().await;
    let server = create_test_server(&db);
    let author = create_test_user(db.pool(), &db.state().keys, "author", 0).await;
    let (name, value) = bearer(&author.token);

    let no_title = server
        .post("/api/posts")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "content": "x" }))
        .await;
    assert_eq!(no_title.status_code(), StatusCode::BAD_REQUEST);

    let media: Vec<String> = (0..6).map(|i| format!("https://img.example.com/{i}.png")).collect();
    let too_much = server
        .post("/api/posts")
        .add_header(name, value)
        .json(&json!({ "title": "t", "content": "x", "media": media }))
        .await;
    assert_eq!(too_much.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_and_delete_post() {
    let db = TestDatabase::new().await;
    let server = create_test_server(&db);
    let keys = db.state().keys;
    let author = create_test_user(db.pool(), &keys, "author", 0).await;
    let other = create_test_user(db.pool(), &keys, "other", 0).await;
    let tier = create_test_tier(db.pool(), author.id, 5).await;
    let post = publish(
        &server,
        &author,
        json!({ "title": "Draft", "content": "x", "tierId": tier.id }),
    )
    .await;
    let path = format!("/api/posts/{}", post.id);

    let (name, value) = bearer(&other.token);
    let forbidden = server
        .put(&path)
        .add_header(name.clone(), value.clone())
        .json(&json!({ "title": "Hijacked" }))
        .await;
    assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);
    let forbidden = server.delete(&path).add_header(name, value).await;
    assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);

    let (name, value) = bearer(&author.token);
    let updated = server
        .put(&path)
        .add_header(name.clone(), value.clone())
        .json(&json!({ "title": "Final", "tierId": "" }))
        .await;
    assert_eq!(updated.status_code(), StatusCode::OK);
    let updated: Post = updated.json();
    assert_eq!(updated.title, "Final");
    assert_eq!(updated.content, "x");
    assert_eq!(updated.gate(), None);

    let deleted = server.delete(&path).add_header(name.clone(), value.clone()).await;
    assert_eq!(deleted.status_code(), StatusCode::OK);
    let gone = server.delete(&path).add_header(name, value).await;
    assert_eq!(gone.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_like_toggles() {
    let db = TestDatabase::new().await;
    let server = create_test_server(&db);
    let keys = db.state().keys;
    let author = create_test_user(db.pool(), &keys, "author", 0).await;
    let fan = create_test_user(db.pool(), &keys, "fan", 0).await;
    let post = publish(&server, &author, json!({ "title": "t", "content": "x" })).await;
    let path = format!("/api/posts/{}/like", post.id);
    let (name, value) = bearer(&fan.token);

    let liked: Value = server.post(&path).add_header(name.clone(), value.clone()).await.json();
    assert_eq!(liked["likes"], json!([fan.id]));

    let unliked: Value = server.post(&path).add_header(name.clone(), value.clone()).await.json();
    assert_eq!(unliked["likes"], json!([]));

    let missing = server
        .post(&format!("/api/posts/{}/like", Uuid::new_v4()))
        .add_header(name, value)
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comments() {
    let db = TestDatabase::new().await;
    let server = create_test_server(&db);
    let keys = db.state().keys;
    let author = create_test_user(db.pool(), &keys, "author", 0).await;
    let fan = create_test_user(db.pool(), &keys, "fan", 0).await;
    let post = publish(&server, &author, json!({ "title": "t", "content": "x" })).await;
    let (name, value) = bearer(&fan.token);

    for content in ["first!", "second"] {
        let response = server
            .post("/api/comments")
            .add_header(name.clone(), value.clone())
            .json(&json!({ "content": content, "postId": post.id }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
    }

    let comments: Vec<Comment> = server
        .get(&format!("/api/posts/{}/comments", post.id))
        .add_header(name.clone(), value.clone())
        .await
        .json();
    let contents: Vec<&str> = comments.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(contents, vec!["second", "first!"]);
    assert!(comments.iter().all(|c| c.author.id == fan.id && c.post_id == post.id));

    let orphan = server
        .post("/api/comments")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "content": "hello?", "postId": Uuid::new_v4() }))
        .await;
    assert_eq!(orphan.status_code(), StatusCode::NOT_FOUND);

    let blank = server
        .post("/api/comments")
        .add_header(name, value)
        .json(&json!({ "content": "   ", "postId": post.id }))
        .await;
    assert_eq!(blank.status_code(), StatusCode::BAD_REQUEST);
}
