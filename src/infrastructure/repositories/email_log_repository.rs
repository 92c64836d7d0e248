//! Email Log Repository Implementation
//!
//! PostgreSQL implementation of the EmailLogRepository trait.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{EmailLog, EmailLogRepository};
use crate::shared::error::AppError;

/// PostgreSQL email log repository implementation.
#[derive(Clone)]
pub struct PgEmailLogRepository {
    pool: PgPool,
}

impl PgEmailLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmailLogRepository for PgEmailLogRepository {
    async fn create(&self, email: &EmailLog) -> Result<EmailLog, AppError> {
        let row = sqlx::query_as::<_, EmailLog>(
            r#"
            INSERT INTO email_logs (email_id, to_email, subject, body, email_type, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING email_id, to_email, subject, body, email_type, status, created_at
            "#,
        )
        .bind(&email.email_id)
        .bind(&email.to_email)
        .bind(&email.subject)
        .bind(&email.body)
        .bind(&email.email_type)
        .bind(&email.status)
        .bind(email.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
