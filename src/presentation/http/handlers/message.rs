//! Message Handlers
//!
//! Persist-then-deliver: a message is stored first, then pushed through the
//! event router to the receiver's live connection. When the receiver is
//! offline the router reports it and the handler logs a notification email
//! instead. Persistence failures abort the request; fallback failures are
//! logged but never fail a request whose message is already stored.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use crate::application::dto::{ConversationResponse, SendMessageRequest};
use crate::application::services::{EmailNotificationService, MessageService};
use crate::domain::Message;
use crate::infrastructure::repositories::{
    PgConversationRepository, PgEmailLogRepository, PgMessageRepository, PgUserRepository,
};
use crate::presentation::middleware::AuthUser;
use crate::presentation::websocket::OutboundEvent;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn message_service(state: &AppState) -> MessageService {
    MessageService::new(
        Arc::new(PgMessageRepository::new(state.db.clone())),
        Arc::new(PgConversationRepository::new(state.db.clone())),
        Arc::new(PgUserRepository::new(state.db.clone())),
    )
}

/// Send a message
pub async fn send_message(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = message_service(&state);
    let (message, receiver) = service.send(&auth_user.user_id, body).await?;

    let delivery = state.router.deliver_to_identity(
        OutboundEvent::NewMessage {
            message: message.clone(),
        },
        &receiver.user_id,
    );

    if !delivery.is_delivered() {
        let sender = service.get_user(&auth_user.user_id).await?;
        let email_service =
            EmailNotificationService::new(Arc::new(PgEmailLogRepository::new(state.db.clone())));

        if let Err(e) = email_service
            .send_new_message_notification(&receiver, &sender.full_name, &message.content)
            .await
        {
            tracing::error!(
                message_id = %message.message_id,
                error = %e,
                "Offline notification email failed"
            );
        }
    }

    Ok((StatusCode::CREATED, Json(message)))
}

/// List the authenticated user's conversations
pub async fn list_conversations(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<ConversationResponse>>, AppError> {
    let conversations = message_service(&state)
        .conversations(&auth_user.user_id)
        .await?;

    Ok(Json(conversations))
}

/// Fetch a conversation's messages (marks them read)
pub async fn conversation_messages(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(conversation_id): Path<String>,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages = message_service(&state)
        .conversation_messages(&conversation_id, &auth_user.user_id)
        .await?;

    Ok(Json(messages))
}
