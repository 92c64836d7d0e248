//! Conversation entity and repository trait.
//!
//! A conversation is the persisted two-party chat thread. Its id doubles as
//! the realtime room id: clients issue `join_conversation` with it over the
//! WebSocket to subscribe to typing events.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A two-party chat thread. Maps to the `conversations` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Conversation {
    /// Prefixed string id (`conv_<hex>`), also used as the room id
    pub conversation_id: String,

    /// The two participant user ids (unordered)
    pub participants: Vec<String>,

    pub created_at: DateTime<Utc>,

    /// Bumped whenever a message lands in the conversation
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Check whether a user participates in this conversation.
    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }
}

/// Repository trait for Conversation data access operations.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Find the conversation between two specific users, if any.
    async fn find_between(&self, a: &str, b: &str) -> Result<Option<Conversation>, AppError>;

    /// Find a conversation by id.
    async fn find_by_id(&self, conversation_id: &str) -> Result<Option<Conversation>, AppError>;

    /// Find all conversations a user participates in, most recent first.
    async fn find_for_user(&self, user_id: &str, limit: i64)
        -> Result<Vec<Conversation>, AppError>;

    /// Create a new conversation.
    async fn create(&self, conversation: &Conversation) -> Result<Conversation, AppError>;

    /// Bump the updated_at timestamp.
    async fn touch(&self, conversation_id: &str, at: DateTime<Utc>) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_participant() {
        let conv = Conversation {
            conversation_id: "conv_0011aabbccdd".into(),
            participants: vec!["user_a".into(), "user_b".into()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(conv.has_participant("user_a"));
        assert!(conv.has_participant("user_b"));
        assert!(!conv.has_participant("user_c"));
    }
}
