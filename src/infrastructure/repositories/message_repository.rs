//! Message Repository Implementation
//!
//! PostgreSQL implementation of the MessageRepository trait.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{Message, MessageRepository};
use crate::shared::error::AppError;

/// PostgreSQL message repository implementation.
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn create(&self, message: &Message) -> Result<Message, AppError> {
        let row = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (message_id, conversation_id, sender_id, receiver_id,
                                  content, file_url, file_name, is_read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING message_id, conversation_id, sender_id, receiver_id,
                      content, file_url, file_name, is_read, created_at
            "#,
        )
        .bind(&message.message_id)
        .bind(&message.conversation_id)
        .bind(&message.sender_id)
        .bind(&message.receiver_id)
        .bind(&message.content)
        .bind(&message.file_url)
        .bind(&message.file_name)
        .bind(message.is_read)
        .bind(message.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Up to `limit` messages of a conversation, newest first.
    async fn find_by_conversation(
        &self,
        conversation_id: &str,
        limit: i64,
    ) -> Result<Vec<Message>, AppError> {
        let rows = sqlx::query_as::<_, Message>(
            r#"
            SELECT message_id, conversation_id, sender_id, receiver_id,
                   content, file_url, file_name, is_read, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(conversation_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_last(&self, conversation_id: &str) -> Result<Option<Message>, AppError> {
        let row = sqlx::query_as::<_, Message>(
            r#"
            SELECT message_id, conversation_id, sender_id, receiver_id,
                   content, file_url, file_name, is_read, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(conversation_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn count_unread(
        &self,
        conversation_id: &str,
        receiver_id: &str,
    ) -> Result<i64, AppError> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM messages
            WHERE conversation_id = $1 AND receiver_id = $2 AND NOT is_read
            "#,
        )
        .bind(conversation_id)
        .bind(receiver_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    async fn mark_read(&self, conversation_id: &str, receiver_id: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE messages
            SET is_read = TRUE
            WHERE conversation_id = $1 AND receiver_id = $2 AND NOT is_read
            "#,
        )
        .bind(conversation_id)
        .bind(receiver_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
