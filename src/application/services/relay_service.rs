//! Relay Service
//!
//! Persists direct messages and forwards them to the recipient's live
//! connection. Delivery is best-effort, at-most-once, and non-durable: an
//! offline recipient only sees the message on their next history fetch.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{ChatMessage, ChatRepository, UserRepository};
use crate::presentation::websocket::messages::{ReceiveMessagePayload, ServerEvent};
use crate::presentation::websocket::registry::ConnectionRegistry;
use crate::shared::snowflake::SnowflakeGenerator;

/// Relay service trait
#[async_trait]
pub trait RelayService: Send + Sync {
    /// Persist a message and push it to the recipient if they are online.
    async fn relay(
        &self,
        sender: &str,
        request: OutboundMessageDto,
    ) -> Result<Delivery, RelayError>;

    /// Full conversation between the caller and another user, ascending by
    /// creation time.
    async fn history(&self, caller: &str, other: &str) -> Result<Vec<ChatMessage>, RelayError>;
}

/// Outbound message request
#[derive(Debug, Clone)]
pub struct OutboundMessageDto {
    pub to: String,
    pub text: String,
    /// Sender-supplied timestamp string. Parsed as RFC 3339 for the
    /// persisted row; echoed back verbatim on the wire.
    pub time: String,
}

/// What happened to a relayed message.
///
/// `Queued` means the row was written but no live connection accepted the
/// push — the recipient finds it in history later. There is no retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Persisted and pushed to the recipient's live connection.
    Delivered,
    /// Persisted; recipient offline or their connection already gone.
    Queued,
}

/// Relay service errors
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Unknown recipient: {0}")]
    UnknownRecipient(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// RelayService implementation
pub struct RelayServiceImpl<U, C>
where
    U: UserRepository,
    C: ChatRepository,
{
    user_repo: Arc<U>,
    chat_repo: Arc<C>,
    registry: Arc<ConnectionRegistry>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<U, C> RelayServiceImpl<U, C>
where
    U: UserRepository,
    C: ChatRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        chat_repo: Arc<C>,
        registry: Arc<ConnectionRegistry>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            user_repo,
            chat_repo,
            registry,
            id_generator,
        }
    }

    /// Parse the client's time string, falling back to server time.
    fn persisted_timestamp(time: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(time)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    }
}

#[async_trait]
impl<U, C> RelayService for RelayServiceImpl<U, C>
where
    U: UserRepository + 'static,
    C: ChatRepository + 'static,
{
    async fn relay(
        &self,
        sender: &str,
        request: OutboundMessageDto,
    ) -> Result<Delivery, RelayError> {
        // A message to a nonexistent identity is an error, not a write
        let recipient_exists = self
            .user_repo
            .username_exists(&request.to)
            .await
            .map_err(|e| RelayError::Storage(e.to_string()))?;

        if !recipient_exists {
            return Err(RelayError::UnknownRecipient(request.to));
        }

        let message = ChatMessage {
            id: self.id_generator.generate(),
            sender: sender.to_string(),
            recipient: request.to.clone(),
            body: request.text.clone(),
            created_at: Self::persisted_timestamp(&request.time),
        };

        self.chat_repo
            .create(&message)
            .await
            .map_err(|e| RelayError::Storage(e.to_string()))?;

        let event = ServerEvent::ReceiveMessage(ReceiveMessagePayload {
            from: sender.to_string(),
            text: request.text,
            time: request.time,
        });

        // Fire-and-forget push; a refused send just means the recipient
        // reads the row from history later
        if self.registry.send_to(&request.to, event) {
            Ok(Delivery::Delivered)
        } else {
            Ok(Delivery::Queued)
        }
    }

    async fn history(&self, caller: &str, other: &str) -> Result<Vec<ChatMessage>, RelayError> {
        self.chat_repo
            .find_conversation(caller, other)
            .await
            .map_err(|e| RelayError::Storage(e.to_string()))
    }
}
