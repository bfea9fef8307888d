//! Message history API integration tests

use axum::http::StatusCode;
use boosty::backend::messaging::db::insert_message;
use boosty::shared::models::{ChatMessage, DialogSummary};
use uuid::Uuid;

use super::{bearer, create_test_server};
use crate::common::{create_test_user, test_config, TestDatabase};

#[tokio::test]
async fn test_dialog_history() {
    let db = TestDatabase::new().await;
    let server = create_test_server(&db);
    let keys = db.state().keys;
    let alice = create_test_user(db.pool(), &keys, "alice", 0).await;
    let bob = create_test_user(db.pool(), &keys, "bob", 0).await;

    insert_message(db.pool(), alice.id, bob.id, "hi").await.unwrap();
    insert_message(db.pool(), bob.id, alice.id, "hey").await.unwrap();

    let (name, value) = bearer(&alice.token);
    let response = server
        .get(&format!("/api/messages/{}", bob.id))
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let messages: Vec<ChatMessage> = response.json();
    let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["hi", "hey"]);

    let dialogs: Vec<DialogSummary> = server
        .get("/api/dialogs")
        .add_header(name.clone(), value.clone())
        .await
        .json();
    assert_eq!(dialogs.len(), 1);
    assert_eq!(dialogs[0].user.id, bob.id);
    assert_eq!(dialogs[0].last_message, "hey");

    let sent: Vec<ChatMessage> = server.get("/api/messages").add_header(name, value).await.json();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].content, "hi");
}

#[tokio::test]
async fn test_history_window_is_configurable() {
    let mut config = test_config();
    config.history_window = 2;
    let db = TestDatabase::with_config(config).await;
    let server = create_test_server(&db);
    let keys = db.state().keys;
    let alice = create_test_user(db.pool(), &keys, "alice", 0).await;
    let bob = create_test_user(db.pool(), &keys, "bob", 0).await;

    for content in ["1", "2", "3"] {
        insert_message(db.pool(), alice.id, bob.id, content).await.unwrap();
    }

    let (name, value) = bearer(&bob.token);
    let messages: Vec<ChatMessage> = server
        .get(&format!("/api/messages/{}", alice.id))
        .add_header(name, value)
        .await
        .json();
    let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["2", "3"]);
}

#[tokio::test]
async fn test_dialog_with_unknown_account() {
    let db = TestDatabase::new().await;
    let server = create_test_server(&db);
    let alice = create_test_user(db.pool(), &db.state().keys, "alice", 0).await;

    let (name, value) = bearer(&alice.token);
    let response = server
        .get(&format!("/api/messages/{}", Uuid::new_v4()))
        .add_header(name, value)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let anonymous = server.get("/api/dialogs").await;
    assert_eq!(anonymous.status_code(), StatusCode::UNAUTHORIZED);
}
