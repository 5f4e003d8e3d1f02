//! Presentation Layer
//!
//! HTTP routes and WebSocket endpoint handlers.

pub mod http;
pub mod middleware;
pub mod websocket;
