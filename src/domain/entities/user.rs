//! User entity, presence state, and repository trait.
//!
//! Maps to the `users` table in the database schema. Accounts are
//! provisioned by the wider platform; this service only reads them to
//! validate handshake identities and message recipients.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;

/// Identifier of a live WebSocket connection.
pub type ConnectionId = Uuid;

/// Runtime connection state for a user.
///
/// Presence is held in the in-process connection registry, never in the
/// database. A user is `Online` exactly while the registry holds a live
/// connection for them; the entry is removed on disconnect, so there is no
/// stale-handle window between disconnect and the next connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// The user has an active, addressable connection.
    Online(ConnectionId),
    /// No live connection is registered for the user.
    Offline,
}

impl Presence {
    /// Check whether the user currently has an addressable connection.
    pub fn is_online(&self) -> bool {
        matches!(self, Presence::Online(_))
    }

    /// The live connection id, if any.
    pub fn connection_id(&self) -> Option<ConnectionId> {
        match self {
            Presence::Online(id) => Some(*id),
            Presence::Offline => None,
        }
    }
}

/// Represents a platform account.
///
/// Maps to the `users` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - username: VARCHAR(32) NOT NULL UNIQUE
/// - display_name: VARCHAR(32) NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Username (unique logical identity; chat messages are keyed by it)
    pub username: String,

    /// Display name (optional, up to 32 characters)
    pub display_name: Option<String>,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Get the user's display name, falling back to username if not set.
    pub fn display_name_or_username(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

/// Repository trait for User data access operations.
///
/// Implementations of this trait handle the actual database interactions.
/// The trait is defined in the domain layer to maintain dependency inversion.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Check if a username is registered.
    async fn username_exists(&self, username: &str) -> Result<bool, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user() -> User {
        User {
            id: 12345678901234567,
            username: "testuser".to_string(),
            display_name: None,
            created_at: Utc::now(),
        }
    }

    // ==========================================================================
    // Presence Tests
    // ==========================================================================

    #[test]
    fn test_presence_online_is_online() {
        let id = Uuid::new_v4();
        let presence = Presence::Online(id);

        assert!(presence.is_online());
        assert_eq!(presence.connection_id(), Some(id));
    }

    #[test]
    fn test_presence_offline_has_no_connection() {
        let presence = Presence::Offline;

        assert!(!presence.is_online());
        assert_eq!(presence.connection_id(), None);
    }

    #[test]
    fn test_presence_equality_is_per_connection() {
        let a = Presence::Online(Uuid::new_v4());
        let b = Presence::Online(Uuid::new_v4());

        // Two different connections are distinct presences
        assert_ne!(a, b);
        assert_eq!(Presence::Offline, Presence::Offline);
    }

    // ==========================================================================
    // User Entity Tests
    // ==========================================================================

    #[test]
    fn test_user_display_name_or_username_returns_display_name_when_set() {
        let mut user = create_test_user();
        user.display_name = Some("Display Name".to_string());

        assert_eq!(user.display_name_or_username(), "Display Name");
    }

    #[test]
    fn test_user_display_name_or_username_returns_username_when_none() {
        let user = create_test_user();
        assert!(user.display_name.is_none());

        assert_eq!(user.display_name_or_username(), "testuser");
    }
}
