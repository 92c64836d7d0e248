//! Call Repository Implementation
//!
//! PostgreSQL implementation of the CallRepository trait. call_type and
//! status are VARCHAR columns mapped to their enums on the way out.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{CallRepository, CallSession, CallStatus, CallType};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct CallRow {
    call_id: String,
    caller_id: String,
    receiver_id: String,
    call_type: String,
    status: String,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    duration_seconds: Option<i32>,
    created_at: DateTime<Utc>,
}

impl CallRow {
    fn into_call(self) -> CallSession {
        CallSession {
            call_id: self.call_id,
            caller_id: self.caller_id,
            receiver_id: self.receiver_id,
            call_type: CallType::from_str(&self.call_type),
            status: CallStatus::from_str(&self.status),
            started_at: self.started_at,
            ended_at: self.ended_at,
            duration_seconds: self.duration_seconds,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL call session repository implementation.
#[derive(Clone)]
pub struct PgCallRepository {
    pool: PgPool,
}

impl PgCallRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CallRepository for PgCallRepository {
    async fn create(&self, call: &CallSession) -> Result<CallSession, AppError> {
        let row = sqlx::query_as::<_, CallRow>(
            r#"
            INSERT INTO call_sessions (call_id, caller_id, receiver_id, call_type, status,
                                       started_at, ended_at, duration_seconds, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING call_id, caller_id, receiver_id, call_type, status,
                      started_at, ended_at, duration_seconds, created_at
            "#,
        )
        .bind(&call.call_id)
        .bind(&call.caller_id)
        .bind(&call.receiver_id)
        .bind(call.call_type.as_str())
        .bind(call.status.as_str())
        .bind(call.started_at)
        .bind(call.ended_at)
        .bind(call.duration_seconds)
        .bind(call.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_call())
    }

    async fn find_by_id(&self, call_id: &str) -> Result<Option<CallSession>, AppError> {
        let row = sqlx::query_as::<_, CallRow>(
            r#"
            SELECT call_id, caller_id, receiver_id, call_type, status,
                   started_at, ended_at, duration_seconds, created_at
            FROM call_sessions
            WHERE call_id = $1
            "#,
        )
        .bind(call_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_call()))
    }

    /// Full-row update keyed by call_id.
    async fn update(&self, call: &CallSession) -> Result<CallSession, AppError> {
        let row = sqlx::query_as::<_, CallRow>(
            r#"
            UPDATE call_sessions
            SET status = $2, started_at = $3, ended_at = $4, duration_seconds = $5
            WHERE call_id = $1
            RETURNING call_id, caller_id, receiver_id, call_type, status,
                      started_at, ended_at, duration_seconds, created_at
            "#,
        )
        .bind(&call.call_id)
        .bind(call.status.as_str())
        .bind(call.started_at)
        .bind(call.ended_at)
        .bind(call.duration_seconds)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_call())
            .ok_or_else(|| AppError::NotFound("Call session not found".to_string()))
    }

    /// Call history for a user as either party, newest first.
    async fn find_for_user(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<CallSession>, AppError> {
        let rows = sqlx::query_as::<_, CallRow>(
            r#"
            SELECT call_id, caller_id, receiver_id, call_type, status,
                   started_at, ended_at, duration_seconds, created_at
            FROM call_sessions
            WHERE caller_id = $1 OR receiver_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_call()).collect())
    }
}
