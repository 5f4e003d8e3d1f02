//! WebSocket Endpoint
//!
//! Real-time message delivery via WebSocket connections.

pub mod handler;
pub mod messages;
pub mod registry;

pub use handler::ws_handler;
pub use messages::{ClientEvent, ReceiveMessagePayload, SendMessagePayload, ServerEvent};
pub use registry::ConnectionRegistry;
