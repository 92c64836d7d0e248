//! Reminder Handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::application::services::{EmailNotificationService, ReminderService};
use crate::domain::Reminder;
use crate::infrastructure::repositories::{
    PgEmailLogRepository, PgReminderRepository, PgUserRepository,
};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn reminder_service(state: &AppState) -> ReminderService {
    ReminderService::new(
        Arc::new(PgReminderRepository::new(state.db.clone())),
        Arc::new(PgUserRepository::new(state.db.clone())),
        Arc::new(EmailNotificationService::new(Arc::new(
            PgEmailLogRepository::new(state.db.clone()),
        ))),
    )
}

/// Unread reminders for the authenticated user
pub async fn list_reminders(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<Reminder>>, AppError> {
    let reminders = reminder_service(&state)
        .pending_for_user(&auth_user.user_id)
        .await?;

    Ok(Json(reminders))
}

/// Mark a reminder as read
pub async fn mark_reminder_read(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(reminder_id): Path<String>,
) -> Result<StatusCode, AppError> {
    reminder_service(&state)
        .mark_read(&reminder_id, &auth_user.user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
