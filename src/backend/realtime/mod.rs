//! Real-time Messaging Relay
//!
//! Authenticated direct messages over WebSocket with fan-out to every open
//! connection.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs      - Module exports and documentation
//! ├── registry.rs - Open connections (weak handles)
//! ├── relay.rs    - Per-frame validation, persistence and ordered broadcast
//! └── socket.rs   - axum WebSocket handler
//! ```
//!
//! # Wire Format
//!
//! Inbound: `{ "token": "...", "content": "...", "recipientId": "..." }`.
//! Outbound: the resolved message `{ id, content, sender, recipient,
//! createdAt }` to everyone, or `{ "error": "..." }` to the sender.
//!
//! There is no offline queue: a client that was not connected when a
//! message was broadcast reads it through the history endpoints.

/// Connection registry
pub mod registry;

/// Frame processing and broadcast
pub mod relay;

/// WebSocket upgrade and connection loop
pub mod socket;

pub use registry::{ConnectionHandle, ConnectionId, ConnectionRegistry};
pub use relay::Relay;
pub use socket::relay_upgrade;
