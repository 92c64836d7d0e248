//! Infrastructure Layer
//!
//! External concerns: database access, repository implementations, metrics.

pub mod database;
pub mod metrics;
pub mod repositories;
