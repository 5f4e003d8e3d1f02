//! WebSocket Message Types
//!
//! JSON envelope formats for the realtime wire protocol. Events keep the
//! camelCase names the Feeds clients already speak: `sendMessage` inbound,
//! `receiveMessage` outbound.

use serde::{Deserialize, Serialize};

/// Incoming client event.
///
/// Wire shape: `{"event": "sendMessage", "data": {"to": ..., "text": ..., "time": ...}}`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Ask the server to deliver a direct message.
    #[serde(rename = "sendMessage")]
    SendMessage(SendMessagePayload),
}

/// Payload of a `sendMessage` event.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessagePayload {
    /// Recipient username
    pub to: String,
    /// Message text
    pub text: String,
    /// Sender-supplied timestamp string, echoed back verbatim on delivery
    pub time: String,
}

/// Outgoing server event.
///
/// Wire shape: `{"event": "receiveMessage", "data": {"from": ..., "text": ..., "time": ...}}`
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// A direct message pushed to the recipient's live connection.
    #[serde(rename = "receiveMessage")]
    ReceiveMessage(ReceiveMessagePayload),
}

/// Payload of a `receiveMessage` event.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiveMessagePayload {
    /// Sender username
    pub from: String,
    /// Message text
    pub text: String,
    /// The sender's `time` string, unmodified
    pub time: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_send_message_event_parses() {
        let json = r#"{"event":"sendMessage","data":{"to":"bob","text":"hi","time":"2026-08-07T10:00:00Z"}}"#;

        let event: ClientEvent = serde_json::from_str(json).unwrap();
        let ClientEvent::SendMessage(payload) = event;

        assert_eq!(payload.to, "bob");
        assert_eq!(payload.text, "hi");
        assert_eq!(payload.time, "2026-08-07T10:00:00Z");
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        let json = r#"{"event":"deleteEverything","data":{}}"#;

        assert!(serde_json::from_str::<ClientEvent>(json).is_err());
    }

    #[test]
    fn test_receive_message_event_wire_shape() {
        let event = ServerEvent::ReceiveMessage(ReceiveMessagePayload {
            from: "alice".to_string(),
            text: "hi".to_string(),
            time: "2026-08-07T10:00:00Z".to_string(),
        });

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "event": "receiveMessage",
                "data": {"from": "alice", "text": "hi", "time": "2026-08-07T10:00:00Z"}
            })
        );
    }
}
