//! Presentation Layer
//!
//! Everything client-facing: the HTTP API, the WebSocket realtime core, and
//! request middleware.

pub mod http;
pub mod middleware;
pub mod websocket;
