//! Conversation Repository Implementation
//!
//! PostgreSQL implementation of the ConversationRepository trait. The
//! participants column is a TEXT[] with a GIN index; the two-party lookup
//! uses array containment so the order the pair is passed in does not matter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Conversation, ConversationRepository};
use crate::shared::error::AppError;

/// PostgreSQL conversation repository implementation.
#[derive(Clone)]
pub struct PgConversationRepository {
    pool: PgPool,
}

impl PgConversationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepository for PgConversationRepository {
    /// Find the conversation between two specific users, if any.
    async fn find_between(&self, a: &str, b: &str) -> Result<Option<Conversation>, AppError> {
        let row = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT conversation_id, participants, created_at, updated_at
            FROM conversations
            WHERE participants @> ARRAY[$1, $2]::TEXT[]
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_id(&self, conversation_id: &str) -> Result<Option<Conversation>, AppError> {
        let row = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT conversation_id, participants, created_at, updated_at
            FROM conversations
            WHERE conversation_id = $1
            "#,
        )
        .bind(conversation_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// All conversations a user participates in, most recently active first.
    async fn find_for_user(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<Conversation>, AppError> {
        let rows = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT conversation_id, participants, created_at, updated_at
            FROM conversations
            WHERE $1 = ANY(participants)
            ORDER BY updated_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn create(&self, conversation: &Conversation) -> Result<Conversation, AppError> {
        let row = sqlx::query_as::<_, Conversation>(
            r#"
            INSERT INTO conversations (conversation_id, participants, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            RETURNING conversation_id, participants, created_at, updated_at
            "#,
        )
        .bind(&conversation.conversation_id)
        .bind(&conversation.participants)
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Bump updated_at so the conversation sorts to the top of the list.
    async fn touch(&self, conversation_id: &str, at: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query("UPDATE conversations SET updated_at = $2 WHERE conversation_id = $1")
            .bind(conversation_id)
            .bind(at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
