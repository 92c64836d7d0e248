//! Data Transfer Objects
//!
//! Request and response body shapes for the HTTP API.

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
