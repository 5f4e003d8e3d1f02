//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.
//!
//! This module provides concrete implementations of the repository traits
//! defined in the domain layer. Each repository handles data access for
//! a specific entity type.
//!
//! ## Available Repositories
//!
//! - **UserRepository** - Read access to platform accounts
//! - **ChatRepository** - Direct message persistence and history
//! - **SessionRepository** - Usage session rows

pub mod chat_repository;
pub mod session_repository;
pub mod user_repository;

// Re-export repository structs for convenience
pub use chat_repository::PgChatRepository;
pub use session_repository::PgSessionRepository;
pub use user_repository::PgUserRepository;
