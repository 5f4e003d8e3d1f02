//! Chat History Handlers

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::services::{RelayError, RelayService, RelayServiceImpl};
use crate::domain::ChatMessage;
use crate::infrastructure::repositories::{PgChatRepository, PgUserRepository};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Conversation history response
#[derive(Debug, Serialize)]
pub struct ChatHistoryResponse {
    pub chats: Vec<ChatMessageResponse>,
}

/// One message on the wire
#[derive(Debug, Serialize)]
pub struct ChatMessageResponse {
    pub from: String,
    pub to: String,
    pub text: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<ChatMessage> for ChatMessageResponse {
    fn from(message: ChatMessage) -> Self {
        Self {
            from: message.sender,
            to: message.recipient,
            text: message.body,
            created_at: message.created_at,
        }
    }
}

/// Get the full conversation between the caller and another user.
///
/// Returns every message the pair has exchanged, ascending by creation
/// time, unpaginated.
pub async fn get_chat(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(username): Path<String>,
) -> Result<Json<ChatHistoryResponse>, AppError> {
    let relay = RelayServiceImpl::new(
        Arc::new(PgUserRepository::new(state.db.clone())),
        Arc::new(PgChatRepository::new(state.db.clone())),
        state.registry.clone(),
        state.snowflake.clone(),
    );

    let messages = relay
        .history(&auth.username, &username)
        .await
        .map_err(|e| match e {
            RelayError::UnknownRecipient(u) => AppError::NotFound(format!("User {} not found", u)),
            RelayError::Storage(msg) => AppError::Internal(msg),
        })?;

    Ok(Json(ChatHistoryResponse {
        chats: messages.into_iter().map(ChatMessageResponse::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_chat_message_response_wire_shape() {
        let created_at: DateTime<Utc> = "2026-08-07T10:00:00Z".parse().unwrap();
        let message = ChatMessage {
            id: 1,
            sender: "alice".to_string(),
            recipient: "bob".to_string(),
            body: "hi".to_string(),
            created_at,
        };

        let json = serde_json::to_value(ChatMessageResponse::from(message)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "from": "alice",
                "to": "bob",
                "text": "hi",
                "createdAt": "2026-08-07T10:00:00Z"
            })
        );
    }
}
