//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **RelayService**: Message persistence and best-effort live delivery
//! - **SessionTracker**: Presence transitions and usage session bookkeeping

pub mod presence_service;
pub mod relay_service;

// Re-export session tracker types
pub use presence_service::SessionTracker;

// Re-export relay service types
pub use relay_service::{
    Delivery, OutboundMessageDto, RelayError, RelayService, RelayServiceImpl,
};
