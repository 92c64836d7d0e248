//! HTTP Request Handlers

pub mod auth;
pub mod booking;
pub mod call;
pub mod file;
pub mod health;
pub mod message;
pub mod reminder;
