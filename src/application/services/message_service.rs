//! Message Service
//!
//! Conversation and message persistence. The service finds or creates the
//! conversation for a sender/receiver pair, stores the message, and hands the
//! stored row back so the HTTP handler can push it through the realtime
//! router (and fall back to email if the receiver is offline).

use std::sync::Arc;

use chrono::Utc;

use crate::application::dto::{ConversationResponse, SendMessageRequest};
use crate::domain::{
    Conversation, ConversationRepository, Message, MessageRepository, User, UserRepository,
};
use crate::shared::error::AppError;
use crate::shared::id::prefixed_id;

const DEFAULT_CONVERSATION_LIMIT: i64 = 50;
const DEFAULT_MESSAGE_LIMIT: i64 = 100;

/// Chat persistence operations.
pub struct MessageService {
    message_repo: Arc<dyn MessageRepository>,
    conversation_repo: Arc<dyn ConversationRepository>,
    user_repo: Arc<dyn UserRepository>,
}

impl MessageService {
    pub fn new(
        message_repo: Arc<dyn MessageRepository>,
        conversation_repo: Arc<dyn ConversationRepository>,
        user_repo: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            message_repo,
            conversation_repo,
            user_repo,
        }
    }

    /// Find the conversation between two users, creating it on first contact.
    async fn find_or_create_conversation(
        &self,
        a: &str,
        b: &str,
    ) -> Result<Conversation, AppError> {
        if let Some(existing) = self.conversation_repo.find_between(a, b).await? {
            return Ok(existing);
        }

        let now = Utc::now();
        let conversation = Conversation {
            conversation_id: prefixed_id("conv"),
            participants: vec![a.to_string(), b.to_string()],
            created_at: now,
            updated_at: now,
        };

        self.conversation_repo.create(&conversation).await
    }

    /// Persist an outgoing message.
    ///
    /// Returns the stored message and the receiver account; the handler
    /// needs the latter for the offline email fallback.
    pub async fn send(
        &self,
        sender_id: &str,
        request: SendMessageRequest,
    ) -> Result<(Message, User), AppError> {
        if request.receiver_id == sender_id {
            return Err(AppError::BadRequest(
                "Cannot send a message to yourself".to_string(),
            ));
        }

        let receiver = self
            .user_repo
            .find_by_id(&request.receiver_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Receiver not found".to_string()))?;

        let conversation = self
            .find_or_create_conversation(sender_id, &receiver.user_id)
            .await?;

        let now = Utc::now();
        let message = Message {
            message_id: prefixed_id("msg"),
            conversation_id: conversation.conversation_id.clone(),
            sender_id: sender_id.to_string(),
            receiver_id: receiver.user_id.clone(),
            content: request.content,
            file_url: request.file_url,
            file_name: request.file_name,
            is_read: false,
            created_at: now,
        };

        let stored = self.message_repo.create(&message).await?;
        self.conversation_repo
            .touch(&conversation.conversation_id, now)
            .await?;

        Ok((stored, receiver))
    }

    /// Fetch a user account, typically the sender for notification copy.
    pub async fn get_user(&self, user_id: &str) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// List a user's conversations with last-message preview and unread count.
    pub async fn conversations(&self, user_id: &str) -> Result<Vec<ConversationResponse>, AppError> {
        let conversations = self
            .conversation_repo
            .find_for_user(user_id, DEFAULT_CONVERSATION_LIMIT)
            .await?;

        let mut responses = Vec::with_capacity(conversations.len());
        for conversation in conversations {
            let last_message = self
                .message_repo
                .find_last(&conversation.conversation_id)
                .await?;
            let unread_count = self
                .message_repo
                .count_unread(&conversation.conversation_id, user_id)
                .await?;

            responses.push(ConversationResponse {
                conversation,
                last_message,
                unread_count,
            });
        }

        Ok(responses)
    }

    /// Fetch a conversation's messages for a participant, oldest first.
    ///
    /// Opening the history marks the reader's unread messages as read.
    pub async fn conversation_messages(
        &self,
        conversation_id: &str,
        user_id: &str,
    ) -> Result<Vec<Message>, AppError> {
        let conversation = self
            .conversation_repo
            .find_by_id(conversation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Conversation not found".to_string()))?;

        if !conversation.has_participant(user_id) {
            return Err(AppError::Forbidden(
                "Not a participant of this conversation".to_string(),
            ));
        }

        let mut messages = self
            .message_repo
            .find_by_conversation(conversation_id, DEFAULT_MESSAGE_LIMIT)
            .await?;
        messages.reverse();

        self.message_repo.mark_read(conversation_id, user_id).await?;

        Ok(messages)
    }
}
