//! Reminder Repository Implementation
//!
//! PostgreSQL implementation of the ReminderRepository trait. The due-reminder
//! query drives the background scheduler and is covered by a partial index on
//! unsent rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Reminder, ReminderRepository};
use crate::shared::error::AppError;

/// PostgreSQL reminder repository implementation.
#[derive(Clone)]
pub struct PgReminderRepository {
    pool: PgPool,
}

impl PgReminderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReminderRepository for PgReminderRepository {
    async fn create(&self, reminder: &Reminder) -> Result<Reminder, AppError> {
        let row = sqlx::query_as::<_, Reminder>(
            r#"
            INSERT INTO reminders (reminder_id, user_id, booking_id, reminder_time,
                                   reminder_type, message, is_sent, is_read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING reminder_id, user_id, booking_id, reminder_time,
                      reminder_type, message, is_sent, is_read, created_at
            "#,
        )
        .bind(&reminder.reminder_id)
        .bind(&reminder.user_id)
        .bind(&reminder.booking_id)
        .bind(reminder.reminder_time)
        .bind(&reminder.reminder_type)
        .bind(&reminder.message)
        .bind(reminder.is_sent)
        .bind(reminder.is_read)
        .bind(reminder.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_pending_for_user(&self, user_id: &str) -> Result<Vec<Reminder>, AppError> {
        let rows = sqlx::query_as::<_, Reminder>(
            r#"
            SELECT reminder_id, user_id, booking_id, reminder_time,
                   reminder_type, message, is_sent, is_read, created_at
            FROM reminders
            WHERE user_id = $1 AND NOT is_read
            ORDER BY reminder_time ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_due(&self, now: DateTime<Utc>) -> Result<Vec<Reminder>, AppError> {
        let rows = sqlx::query_as::<_, Reminder>(
            r#"
            SELECT reminder_id, user_id, booking_id, reminder_time,
                   reminder_type, message, is_sent, is_read, created_at
            FROM reminders
            WHERE reminder_time <= $1 AND NOT is_sent
            ORDER BY reminder_time ASC
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn mark_read(&self, reminder_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE reminders SET is_read = TRUE WHERE reminder_id = $1")
            .bind(reminder_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Reminder not found".to_string()));
        }

        Ok(())
    }

    async fn mark_sent(&self, reminder_id: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE reminders SET is_sent = TRUE WHERE reminder_id = $1")
            .bind(reminder_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
