/**
 * Connection Registry
 *
 * Process-wide set of open relay connections. Each connection owns the only
 * strong sender of its outbound queue; the registry keeps a weak handle, so
 * a connection that went away without unregistering cannot be kept alive by
 * it and is pruned on the next broadcast.
 *
 * A connection is added by `register` and removed when its
 * `ConnectionHandle` is dropped.
 */

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender};

pub type ConnectionId = u64;

#[derive(Default)]
struct RegistryInner {
    next_id: AtomicU64,
    connections: Mutex<HashMap<ConnectionId, WeakUnboundedSender<String>>>,
}

impl RegistryInner {
    fn connections(&self) -> MutexGuard<'_, HashMap<ConnectionId, WeakUnboundedSender<String>>> {
        self.connections.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    inner: Arc<RegistryInner>,
}

/// A registered connection
///
/// Holds the strong end of the outbound queue. Dropping it unregisters the
/// connection and closes the queue.
pub struct ConnectionHandle {
    id: ConnectionId,
    sender: UnboundedSender<String>,
    registry: Arc<RegistryInner>,
}

impl ConnectionHandle {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue a frame for this connection only
    pub fn send(&self, text: String) -> bool {
        self.sender.send(text).is_ok()
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        self.registry.connections().remove(&self.id);
        tracing::debug!("[Relay] Connection {} unregistered", self.id);
    }
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection and return its handle and outbound queue
    pub fn register(&self) -> (ConnectionHandle, UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);

        self.inner.connections().insert(id, sender.downgrade());
        tracing::debug!("[Relay] Connection {} registered", id);

        let handle = ConnectionHandle {
            id,
            sender,
            registry: self.inner.clone(),
        };
        (handle, receiver)
    }

    /// Queue a frame on every live connection, pruning dead ones.
    ///
    /// Returns the number of connections the frame was queued on.
    pub fn broadcast(&self, text: &str) -> usize {
        let mut connections = self.inner.connections();
        let mut delivered = 0;

        connections.retain(|id, weak| match weak.upgrade() {
            Some(sender) if sender.send(text.to_string()).is_ok() => {
                delivered += 1;
                true
            }
            _ => {
                tracing::debug!("[Relay] Pruning dead connection {}", id);
                false
            }
        });

        delivered
    }

    /// Number of registered connections
    pub fn len(&self) -> usize {
        self.inner.connections().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
