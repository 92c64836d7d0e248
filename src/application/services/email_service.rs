//! Email Notification Service
//!
//! Offline fallback: when a realtime event cannot reach a live connection,
//! the relevant handler composes a notification email here. Emails are
//! recorded in the email_logs table rather than handed to a provider.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{EmailLog, EmailLogRepository, User};
use crate::shared::error::AppError;
use crate::shared::id::prefixed_id;

const PREVIEW_MAX_CHARS: usize = 100;

/// Records notification emails for offline recipients.
pub struct EmailNotificationService {
    email_repo: Arc<dyn EmailLogRepository>,
}

impl EmailNotificationService {
    pub fn new(email_repo: Arc<dyn EmailLogRepository>) -> Self {
        Self { email_repo }
    }

    async fn log_email(
        &self,
        to_email: &str,
        subject: String,
        body: String,
        email_type: &str,
    ) -> Result<(), AppError> {
        let email = EmailLog {
            email_id: prefixed_id("email"),
            to_email: to_email.to_string(),
            subject,
            body,
            email_type: email_type.to_string(),
            status: "logged".to_string(),
            created_at: Utc::now(),
        };

        self.email_repo.create(&email).await?;
        tracing::info!(to = %to_email, email_type, "Notification email logged");
        Ok(())
    }

    /// Notify an offline user about a new chat message.
    pub async fn send_new_message_notification(
        &self,
        recipient: &User,
        sender_name: &str,
        content: &str,
    ) -> Result<(), AppError> {
        let preview = truncate_preview(content);
        let subject = format!("New message from {} on EduAdvise", sender_name);
        let body = format!(
            "Hi {},\n\n{} sent you a message:\n\n\"{}\"\n\n\
             Log in to EduAdvise to reply.\n\n- The EduAdvise Team",
            recipient.full_name, sender_name, preview
        );

        self.log_email(&recipient.email, subject, body, "new_message")
            .await
    }

    /// Notify an offline user about a call they could not receive.
    pub async fn send_incoming_call_notification(
        &self,
        recipient: &User,
        caller_name: &str,
        call_type: &str,
    ) -> Result<(), AppError> {
        let subject = format!("Missed {} call from {} on EduAdvise", call_type, caller_name);
        let body = format!(
            "Hi {},\n\n{} tried to reach you with a {} call while you were offline.\n\n\
             Log in to EduAdvise to call back.\n\n- The EduAdvise Team",
            recipient.full_name, caller_name, call_type
        );

        self.log_email(&recipient.email, subject, body, "missed_call")
            .await
    }

    /// Confirmation email sent when a booking is created.
    pub async fn send_booking_confirmation(
        &self,
        recipient: &User,
        service_name: &str,
        session_date: &str,
    ) -> Result<(), AppError> {
        let subject = "Your EduAdvise session is booked".to_string();
        let body = format!(
            "Hi {},\n\nYour session \"{}\" is booked for {}.\n\n\
             You will receive reminders 24 hours and 1 hour before it starts.\n\n\
             - The EduAdvise Team",
            recipient.full_name, service_name, session_date
        );

        self.log_email(&recipient.email, subject, body, "booking_confirmed")
            .await
    }

    /// Reminder email mirroring an in-app reminder, for offline users.
    pub async fn send_booking_reminder(
        &self,
        recipient: &User,
        message: &str,
        reminder_type: &str,
    ) -> Result<(), AppError> {
        let subject = "Upcoming EduAdvise session reminder".to_string();
        let body = format!(
            "Hi {},\n\n{}\n\n- The EduAdvise Team",
            recipient.full_name, message
        );
        let email_type = format!("reminder_{}", reminder_type);

        self.log_email(&recipient.email, subject, body, &email_type)
            .await
    }
}

/// Truncate message content for use in an email preview.
fn truncate_preview(content: &str) -> String {
    if content.chars().count() <= PREVIEW_MAX_CHARS {
        content.to_string()
    } else {
        let truncated: String = content.chars().take(PREVIEW_MAX_CHARS).collect();
        format!("{}...", truncated)
    }
}
