//! Message entity and repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A chat message. Maps to the `messages` table.
///
/// Serialized as-is onto the wire as the payload of the `new_message`
/// realtime event, so field names here are part of the client protocol.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    /// Prefixed string id (`msg_<hex>`)
    pub message_id: String,

    pub conversation_id: String,

    pub sender_id: String,

    pub receiver_id: String,

    pub content: String,

    /// Optional attachment URL (from the files endpoint)
    pub file_url: Option<String>,

    pub file_name: Option<String>,

    pub is_read: bool,

    pub created_at: DateTime<Utc>,
}

/// Repository trait for Message data access operations.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Create a new message.
    async fn create(&self, message: &Message) -> Result<Message, AppError>;

    /// Fetch up to `limit` messages of a conversation, newest first.
    async fn find_by_conversation(
        &self,
        conversation_id: &str,
        limit: i64,
    ) -> Result<Vec<Message>, AppError>;

    /// Fetch the most recent message of a conversation.
    async fn find_last(&self, conversation_id: &str) -> Result<Option<Message>, AppError>;

    /// Count unread messages addressed to `receiver_id` in a conversation.
    async fn count_unread(
        &self,
        conversation_id: &str,
        receiver_id: &str,
    ) -> Result<i64, AppError>;

    /// Mark all messages addressed to `receiver_id` in a conversation as read.
    async fn mark_read(&self, conversation_id: &str, receiver_id: &str) -> Result<(), AppError>;
}
