//! Connection Registry
//!
//! Tracks which users currently have a live WebSocket connection and owns
//! the outbound channel for each. Presence is the registry's contents: a
//! user is online exactly while an entry exists for them.

use dashmap::DashMap;
use tokio::sync::mpsc;

use super::messages::ServerEvent;
use crate::domain::{ConnectionId, Presence};

/// A connected client with its outbound message channel.
struct ConnectedClient {
    connection_id: ConnectionId,
    sender: mpsc::UnboundedSender<ServerEvent>,
}

/// Registry of live connections, keyed by username.
///
/// One live connection per user: registering again overwrites the previous
/// entry, so the newest connection always wins. Unregistration is guarded
/// by connection id — a disconnect for an already-replaced connection
/// leaves the newer entry untouched.
pub struct ConnectionRegistry {
    clients: DashMap<String, ConnectedClient>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            clients: DashMap::new(),
        }
    }

    /// Register a connection for a user, replacing any prior one.
    pub fn register(
        &self,
        username: &str,
        connection_id: ConnectionId,
        sender: mpsc::UnboundedSender<ServerEvent>,
    ) {
        let replaced = self
            .clients
            .insert(
                username.to_string(),
                ConnectedClient {
                    connection_id,
                    sender,
                },
            )
            .is_some();

        tracing::info!(
            username = %username,
            connection_id = %connection_id,
            replaced = replaced,
            "Connection registered"
        );
    }

    /// Remove a user's entry, but only if it still belongs to
    /// `connection_id`. Returns whether an entry was removed.
    pub fn unregister(&self, username: &str, connection_id: ConnectionId) -> bool {
        let removed = self
            .clients
            .remove_if(username, |_, client| client.connection_id == connection_id)
            .is_some();

        if removed {
            tracing::info!(
                username = %username,
                connection_id = %connection_id,
                "Connection unregistered"
            );
        }

        removed
    }

    /// Current presence for a user.
    pub fn presence(&self, username: &str) -> Presence {
        self.clients
            .get(username)
            .map(|client| Presence::Online(client.connection_id))
            .unwrap_or(Presence::Offline)
    }

    /// Push an event to a user's live connection.
    ///
    /// Returns false when the user has no registered connection or the
    /// connection's channel is already closed; the event is dropped either
    /// way (best-effort delivery, no queueing here).
    pub fn send_to(&self, username: &str, event: ServerEvent) -> bool {
        match self.clients.get(username) {
            Some(client) => client.sender.send(event).is_ok(),
            None => false,
        }
    }

    /// Number of live connections.
    pub fn online_count(&self) -> usize {
        self.clients.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
