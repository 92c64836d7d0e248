//! Reminder entity and repository trait.
//!
//! Reminders are created alongside bookings and pushed to their user over
//! the realtime layer by a background task when due. Delivery is fire-once:
//! a reminder is marked sent whether or not the user was online.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// An in-app reminder. Maps to the `reminders` table.
///
/// Serialized onto the wire as the payload of the `reminder` realtime event.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reminder {
    /// Prefixed string id (`reminder_<hex>`)
    pub reminder_id: String,

    pub user_id: String,

    pub booking_id: String,

    /// When the reminder becomes due
    pub reminder_time: DateTime<Utc>,

    /// Lead-time tag: "24h" or "1h"
    pub reminder_type: String,

    pub message: String,

    pub is_sent: bool,

    pub is_read: bool,

    pub created_at: DateTime<Utc>,
}

/// Repository trait for Reminder data access operations.
#[async_trait]
pub trait ReminderRepository: Send + Sync {
    /// Create a new reminder.
    async fn create(&self, reminder: &Reminder) -> Result<Reminder, AppError>;

    /// Unread reminders for a user, soonest first.
    async fn find_pending_for_user(&self, user_id: &str) -> Result<Vec<Reminder>, AppError>;

    /// Reminders that are due at `now` and not yet sent.
    async fn find_due(&self, now: DateTime<Utc>) -> Result<Vec<Reminder>, AppError>;

    /// Mark a reminder as read.
    async fn mark_read(&self, reminder_id: &str) -> Result<(), AppError>;

    /// Mark a reminder as sent.
    async fn mark_sent(&self, reminder_id: &str) -> Result<(), AppError>;
}
