//! Chat Repository Implementation
//!
//! PostgreSQL implementation of the ChatRepository trait. Conversation
//! reads return the full message history for a pair of usernames in
//! ascending creation order — there is no pagination on this surface.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{ChatMessage, ChatRepository};
use crate::shared::error::AppError;

/// Internal row type for chat message queries.
#[derive(Debug, sqlx::FromRow)]
struct ChatMessageRow {
    id: i64,
    sender: String,
    recipient: String,
    body: String,
    created_at: DateTime<Utc>,
}

impl ChatMessageRow {
    /// Convert database row to domain ChatMessage entity.
    fn into_message(self) -> ChatMessage {
        ChatMessage {
            id: self.id,
            sender: self.sender,
            recipient: self.recipient,
            body: self.body,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL chat repository implementation.
pub struct PgChatRepository {
    pool: PgPool,
}

impl PgChatRepository {
    /// Creates a new PgChatRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    /// Persist a new chat message.
    async fn create(&self, message: &ChatMessage) -> Result<ChatMessage, AppError> {
        let row = sqlx::query_as::<_, ChatMessageRow>(
            r#"
            INSERT INTO chat_messages (id, sender, recipient, body, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, sender, recipient, body, created_at
            "#,
        )
        .bind(message.id)
        .bind(&message.sender)
        .bind(&message.recipient)
        .bind(&message.body)
        .bind(message.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_message())
    }

    /// Fetch the full conversation between two usernames, both directions,
    /// ascending by creation time.
    async fn find_conversation(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> Result<Vec<ChatMessage>, AppError> {
        let rows = sqlx::query_as::<_, ChatMessageRow>(
            r#"
            SELECT id, sender, recipient, body, created_at
            FROM chat_messages
            WHERE (sender = $1 AND recipient = $2)
               OR (sender = $2 AND recipient = $1)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_message()).collect())
    }
}
