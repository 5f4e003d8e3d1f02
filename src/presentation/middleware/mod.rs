//! Middleware
//!
//! Tower middleware for request processing.

pub mod auth;
pub mod cors;
pub mod logging;
pub mod security;

pub use auth::{auth_middleware, token_from_cookie_header, verify_token, AuthUser, Claims};
pub use security::security_headers;
