//! # Domain Entities
//!
//! Core domain entities representing the main business objects in the
//! realtime service. All persisted entities map directly to their
//! corresponding database tables.
//!
//! ## Core Entities
//!
//! - **User**: A platform account, read-only from this service's perspective
//! - **ChatMessage**: A direct message between two usernames
//! - **UsageSession**: One continuous interval of user connectivity
//! - **Presence**: Runtime connection state (`Online`/`Offline`), never persisted
//!
//! ## Repository Traits
//!
//! Each persisted entity has an associated repository trait defining data
//! access operations. These traits are implemented in the infrastructure
//! layer, following the dependency inversion principle.

mod chat;
mod usage_session;
mod user;

// Re-export ChatMessage entity and related types
pub use chat::{ChatMessage, ChatRepository};

// Re-export UsageSession entity and related types
pub use usage_session::{SessionRepository, UsageSession};

// Re-export User entity and related types
pub use user::{ConnectionId, Presence, User, UserRepository};
