//! Email log entity and repository trait.
//!
//! The offline-fallback notifier records outgoing emails here instead of
//! actually sending them; a production deployment would hand them to an
//! email provider.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A logged notification email. Maps to the `email_logs` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EmailLog {
    /// Prefixed string id (`email_<hex>`)
    pub email_id: String,

    pub to_email: String,

    pub subject: String,

    pub body: String,

    /// Category tag: "new_message", "missed_call", "booking_confirmed", "reminder_24h", ...
    pub email_type: String,

    /// Always "logged" in this implementation
    pub status: String,

    pub created_at: DateTime<Utc>,
}

/// Repository trait for email log persistence.
#[async_trait]
pub trait EmailLogRepository: Send + Sync {
    /// Record an outgoing email.
    async fn create(&self, email: &EmailLog) -> Result<EmailLog, AppError>;
}
