//! Chat message entity and repository trait.
//!
//! Maps to the `chat_messages` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A direct message between two usernames.
///
/// Maps to the `chat_messages` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - sender: VARCHAR(32) NOT NULL
/// - recipient: VARCHAR(32) NOT NULL
/// - body: TEXT NOT NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
///
/// Sender and recipient are raw usernames rather than foreign keys; the
/// relay validates the recipient against the `users` table before a row is
/// written. There is no delivery or read status on the row itself —
/// delivery is best-effort and recorded nowhere (see the relay service).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Username of the sending user
    pub sender: String,

    /// Username of the receiving user
    pub recipient: String,

    /// Message text
    pub body: String,

    /// Timestamp when the message was sent
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Check whether the given username is a participant of this message.
    pub fn involves(&self, username: &str) -> bool {
        self.sender == username || self.recipient == username
    }

    /// The other participant from `username`'s point of view.
    ///
    /// Returns the sender when called with the recipient and vice versa;
    /// `None` if `username` is not a participant at all.
    pub fn counterpart(&self, username: &str) -> Option<&str> {
        if self.sender == username {
            Some(&self.recipient)
        } else if self.recipient == username {
            Some(&self.sender)
        } else {
            None
        }
    }
}

/// Repository trait for chat message data access operations.
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Persist a new chat message.
    async fn create(&self, message: &ChatMessage) -> Result<ChatMessage, AppError>;

    /// Fetch the full conversation between two usernames, both directions,
    /// ascending by creation time. Unpaginated by design: history reads
    /// return everything the pair has ever exchanged.
    async fn find_conversation(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> Result<Vec<ChatMessage>, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_message() -> ChatMessage {
        ChatMessage {
            id: 1,
            sender: "alice".to_string(),
            recipient: "bob".to_string(),
            body: "hi".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_involves_both_participants() {
        let message = create_test_message();

        assert!(message.involves("alice"));
        assert!(message.involves("bob"));
        assert!(!message.involves("carol"));
    }

    #[test]
    fn test_counterpart_is_symmetric() {
        let message = create_test_message();

        assert_eq!(message.counterpart("alice"), Some("bob"));
        assert_eq!(message.counterpart("bob"), Some("alice"));
        assert_eq!(message.counterpart("carol"), None);
    }
}
