//! # Feeds Realtime Server Library
//!
//! This crate provides the realtime core of the Feeds platform:
//! - WebSocket endpoint for direct message delivery
//! - In-process presence tracking with usage session bookkeeping
//! - RESTful HTTP API for conversation history and usage records
//! - PostgreSQL for persistent storage
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Core business entities and repository traits
//! - **Application Layer**: Relay and presence services
//! - **Infrastructure Layer**: Database and metrics implementations
//! - **Presentation Layer**: HTTP handlers and the WebSocket endpoint
//!
//! ## Module Structure
//!
//! ```text
//! feeds_server/
//! +-- config/        Configuration management
//! +-- domain/        Domain entities and traits
//! +-- application/   Application services
//! +-- infrastructure/ Database and metrics implementations
//! +-- presentation/  HTTP routes and WebSocket handlers
//! +-- shared/        Common utilities (errors, snowflake IDs)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP and WebSocket handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
