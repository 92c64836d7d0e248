//! # EduAdvise Server Library
//!
//! Backend for the EduAdvise counseling platform:
//! - RESTful HTTP API for auth, messaging, calls, bookings, and files
//! - WebSocket realtime layer for presence, chat events, typing indicators,
//!   call signaling, and reminders
//! - PostgreSQL for persistent storage
//! - Email fallback for users who are offline when an event arrives
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Core business entities and repository traits
//! - **Application Layer**: Business logic services and DTOs
//! - **Infrastructure Layer**: Database and metrics implementations
//! - **Presentation Layer**: HTTP handlers and the WebSocket realtime core
//!
//! ## Module Structure
//!
//! ```text
//! eduadvise_server/
//! +-- config/        Configuration management
//! +-- domain/        Domain entities and repository traits
//! +-- application/   Application services and DTOs
//! +-- infrastructure/ Database and metrics implementations
//! +-- presentation/  HTTP routes, middleware, and WebSocket handlers
//! +-- shared/        Common utilities (errors, prefixed ids)
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
