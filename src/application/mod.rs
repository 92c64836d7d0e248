//! Application Layer
//!
//! Use-case services and the DTOs they exchange with the HTTP surface.

pub mod dto;
pub mod services;
