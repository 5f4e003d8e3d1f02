//! WebSocket Connection Handler
//!
//! Handles individual WebSocket connections. Identity is established at
//! the handshake from the signed token cookie; a connection that fails
//! verification is never upgraded. Once admitted, the connection is
//! registered for delivery and the session tracker is notified of the
//! connect/disconnect transitions.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use axum_extra::{headers::Cookie, TypedHeader};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use super::messages::{ClientEvent, ServerEvent};
use crate::application::services::{
    Delivery, OutboundMessageDto, RelayService, RelayServiceImpl,
};
use crate::domain::UserRepository;
use crate::infrastructure::metrics;
use crate::infrastructure::repositories::{PgChatRepository, PgUserRepository};
use crate::presentation::middleware::verify_token;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// WebSocket upgrade handler.
///
/// The handshake contract: the client presents the signed token in the
/// configured cookie. Verification failure or an unknown username refuses
/// the upgrade with 401 — the socket is never admitted.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    cookies: Option<TypedHeader<Cookie>>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let TypedHeader(cookies) =
        cookies.ok_or_else(|| AppError::Unauthorized("Missing auth cookie".into()))?;

    let token = cookies
        .get(&state.settings.auth.cookie_name)
        .ok_or_else(|| AppError::Unauthorized("Missing auth cookie".into()))?;

    let username = verify_token(token, &state.settings.auth)?;

    let user = PgUserRepository::new(state.db.clone())
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unknown user".into()))?;

    let ws = ws
        .max_message_size(state.settings.websocket.max_message_size)
        .max_frame_size(state.settings.websocket.max_frame_size);

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user.username)))
}

/// Handle an admitted WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState, username: String) {
    let connection_id = Uuid::new_v4();

    tracing::debug!(
        username = %username,
        connection_id = %connection_id,
        "New WebSocket connection"
    );

    // Split socket for concurrent read/write
    let (mut sender, mut receiver) = socket.split();

    // Create channel for outgoing events
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    // Spawn task to forward events from channel to WebSocket
    let sender_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(t) => t,
                Err(e) => {
                    tracing::error!("Failed to serialize event: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Register for delivery and open/continue the usage session
    state.registry.register(&username, connection_id, tx);
    if let Err(e) = state.tracker.on_connect(&username).await {
        tracing::error!(username = %username, error = %e, "Failed to open usage session");
    }
    metrics::set_websocket_connections(state.registry.online_count() as i64);

    tracing::info!(
        username = %username,
        connection_id = %connection_id,
        "User connected"
    );

    let relay = RelayServiceImpl::new(
        Arc::new(PgUserRepository::new(state.db.clone())),
        Arc::new(PgChatRepository::new(state.db.clone())),
        state.registry.clone(),
        state.snowflake.clone(),
    );

    // Main message loop
    while let Some(frame) = receiver.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                handle_frame(&text, &username, &relay).await;
            }
            Ok(Message::Close(_)) => {
                tracing::debug!(username = %username, "Connection closed");
                break;
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                // Pong is handled automatically by axum
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(username = %username, error = %e, "WebSocket error");
                break;
            }
        }
    }

    // Cleanup: clear presence, arm the logout debounce
    state.registry.unregister(&username, connection_id);
    state.tracker.on_disconnect(&username);
    metrics::set_websocket_connections(state.registry.online_count() as i64);
    sender_task.abort();

    tracing::info!(
        username = %username,
        connection_id = %connection_id,
        "User disconnected"
    );
}

/// Handle one inbound text frame.
///
/// Relay failures are logged and counted but never reported back to the
/// sending socket; only the handshake surfaces errors to the client.
async fn handle_frame<R: RelayService>(text: &str, username: &str, relay: &R) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!(username = %username, error = %e, "Unparseable frame");
            return;
        }
    };

    match event {
        ClientEvent::SendMessage(payload) => {
            let to = payload.to.clone();
            let request = OutboundMessageDto {
                to: payload.to,
                text: payload.text,
                time: payload.time,
            };

            match relay.relay(username, request).await {
                Ok(Delivery::Delivered) => {
                    metrics::record_relay_outcome("delivered");
                    tracing::debug!(from = %username, to = %to, "Message delivered");
                }
                Ok(Delivery::Queued) => {
                    metrics::record_relay_outcome("queued");
                    tracing::debug!(from = %username, to = %to, "Recipient offline, message queued");
                }
                Err(e) => {
                    metrics::record_relay_outcome("failed");
                    tracing::warn!(from = %username, to = %to, error = %e, "Relay failed");
                }
            }
        }
    }
}
