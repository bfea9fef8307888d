/**
 * Messaging Relay
 *
 * Processes inbound relay frames. Every frame is handled on its own:
 *
 * 1. Decode and validate `{ token, content, recipientId }`
 * 2. Resolve the token to the sender; the sender must still exist
 * 3. The recipient must exist
 * 4. Persist the message
 * 5. Broadcast the resolved message to every open connection
 *
 * Steps 4 and 5 run under the publish lock, so connections see messages in
 * the order they were stored. A failure at any step is answered with an
 * `{ "error": ... }` frame to the sender only; the connection stays open.
 */

use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::{mpsc::UnboundedReceiver, Mutex};

use crate::backend::auth::sessions::SessionKeys;
use crate::backend::auth::users::account_exists;
use crate::backend::error::{BackendError, BackendResult, Entity};
use crate::backend::messaging::db::insert_message;
use crate::backend::realtime::registry::{ConnectionHandle, ConnectionRegistry};
use crate::shared::models::ChatMessage;
use crate::shared::SharedError;
use crate::shared::wire::{RelayFrame, RelayOutbound};

#[derive(Clone)]
pub struct Relay {
    pool: SqlitePool,
    keys: SessionKeys,
    registry: ConnectionRegistry,
    publish: Arc<Mutex<()>>,
}

impl Relay {
    pub fn new(pool: SqlitePool, keys: SessionKeys) -> Self {
        Self {
            pool,
            keys,
            registry: ConnectionRegistry::new(),
            publish: Arc::new(Mutex::new(())),
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Register a new connection
    pub fn connect(&self) -> (ConnectionHandle, UnboundedReceiver<String>) {
        self.registry.register()
    }

    /// Handle one inbound text frame from `connection`
    pub async fn handle_text(&self, connection: &ConnectionHandle, text: &str) {
        match self.process(text).await {
            Ok(message) => {
                tracing::debug!(
                    "[Relay] Message {} from {} to {}",
                    message.id,
                    message.sender.id,
                    message.recipient.id
                );
            }
            Err(e) => self.report(connection, &e),
        }
    }

    /// Answer a binary frame; only text frames carry relay messages
    pub fn reject_binary(&self, connection: &ConnectionHandle) {
        let err = BackendError::from(SharedError::message("Binary frames are not supported"));
        self.report(connection, &err);
    }

    fn report(&self, connection: &ConnectionHandle, e: &BackendError) {
        if e.is_internal() {
            tracing::error!("[Relay] Frame on connection {} failed: {}", connection.id(), e);
        } else {
            tracing::debug!("[Relay] Frame on connection {} rejected: {}", connection.id(), e);
        }
        self.reply(connection, &RelayOutbound::from(e));
    }

    /// Send a frame to one connection only
    pub fn reply(&self, connection: &ConnectionHandle, frame: &RelayOutbound) {
        match frame.to_json() {
            Ok(text) => {
                connection.send(text);
            }
            Err(e) => tracing::error!("[Relay] Failed to encode reply: {}", e),
        }
    }

    /// Validate, persist and broadcast one frame
    pub async fn process(&self, text: &str) -> BackendResult<ChatMessage> {
        let frame = RelayFrame::parse(text)?;

        let sender_id = self.keys.resolve(&frame.token)?;
        if !account_exists(&self.pool, sender_id).await? {
            tracing::warn!("[Relay] Token for missing account {}", sender_id);
            return Err(BackendError::Unauthenticated);
        }

        if !account_exists(&self.pool, frame.recipient_id).await? {
            return Err(BackendError::not_found(Entity::Recipient));
        }

        let _publish = self.publish.lock().await;

        let message = insert_message(&self.pool, sender_id, frame.recipient_id, &frame.content).await?;
        let text = RelayOutbound::Message(message.clone()).to_json()?;
        let delivered = self.registry.broadcast(&text);
        tracing::debug!("[Relay] Message {} delivered to {} connections", message.id, delivered);

        Ok(message)
    }
}
