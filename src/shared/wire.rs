//! Relay wire format.
//!
//! Inbound frames are decoded into [`RawRelayFrame`] (every field optional) and
//! then validated into [`RelayFrame`]. Validation stops at the first missing or
//! malformed field so the error names exactly one field.
//!
//! ```json
//! { "token": "<jwt>", "content": "hello", "recipientId": "<uuid>" }
//! ```
//!
//! Outbound frames are either `{ "error": "..." }` (sent to the originating
//! connection only) or a resolved [`ChatMessage`] (sent to everyone).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::{required, SharedError};
use crate::shared::models::ChatMessage;

/// Inbound frame as decoded, before any checks
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRelayFrame {
    #[serde(default, alias = "credential")]
    pub token: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub recipient_id: Option<String>,
}

/// A validated inbound frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayFrame {
    pub token: String,
    pub content: String,
    pub recipient_id: Uuid,
}

impl RelayFrame {
    /// Decode and validate a text frame
    pub fn parse(text: &str) -> Result<Self, SharedError> {
        let raw: RawRelayFrame = serde_json::from_str(text)?;
        Self::try_from(raw)
    }
}

impl TryFrom<RawRelayFrame> for RelayFrame {
    type Error = SharedError;

    fn try_from(raw: RawRelayFrame) -> Result<Self, Self::Error> {
        let token = required(raw.token, "token")?;
        let content = required(raw.content, "content")?;
        let recipient = required(raw.recipient_id, "recipientId")?;
        let recipient_id = Uuid::parse_str(recipient.trim())
            .map_err(|_| SharedError::validation("recipientId", "is not a valid id"))?;

        Ok(Self {
            token,
            content,
            recipient_id,
        })
    }
}

/// Anything the relay writes to a connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelayOutbound {
    Error { error: String },
    Message(ChatMessage),
}

impl RelayOutbound {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    pub fn to_json(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }
}
