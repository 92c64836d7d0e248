//! Reminder Service
//!
//! Due-reminder processing for the background scheduler, plus the user-facing
//! pending list. Delivery is fire-once: a reminder is marked sent after one
//! attempt whether it reached a live connection or fell back to email.

use std::sync::Arc;

use chrono::Utc;

use crate::application::services::email_service::EmailNotificationService;
use crate::domain::{Reminder, ReminderRepository, UserRepository};
use crate::presentation::websocket::{EventRouter, OutboundEvent};
use crate::shared::error::AppError;

/// Reminder delivery and read-state operations.
pub struct ReminderService {
    reminder_repo: Arc<dyn ReminderRepository>,
    user_repo: Arc<dyn UserRepository>,
    email_service: Arc<EmailNotificationService>,
}

impl ReminderService {
    pub fn new(
        reminder_repo: Arc<dyn ReminderRepository>,
        user_repo: Arc<dyn UserRepository>,
        email_service: Arc<EmailNotificationService>,
    ) -> Self {
        Self {
            reminder_repo,
            user_repo,
            email_service,
        }
    }

    /// Deliver every due reminder once.
    ///
    /// Online users get a realtime `reminder` event; offline users get an
    /// email. Either way the reminder is marked sent so the next poll does
    /// not pick it up again. Returns how many reminders were processed.
    pub async fn process_due(&self, router: &EventRouter) -> Result<usize, AppError> {
        let due = self.reminder_repo.find_due(Utc::now()).await?;
        let count = due.len();

        for reminder in due {
            if let Err(e) = self.deliver(&reminder, router).await {
                tracing::error!(
                    reminder_id = %reminder.reminder_id,
                    error = %e,
                    "Reminder delivery failed"
                );
            }

            // A failed mark leaves the reminder pending for the next poll;
            // the rest of the batch still goes out.
            if let Err(e) = self.reminder_repo.mark_sent(&reminder.reminder_id).await {
                tracing::error!(
                    reminder_id = %reminder.reminder_id,
                    error = %e,
                    "Failed to mark reminder as sent"
                );
            }
        }

        Ok(count)
    }

    async fn deliver(&self, reminder: &Reminder, router: &EventRouter) -> Result<(), AppError> {
        let delivery = router.deliver_to_identity(
            OutboundEvent::Reminder {
                reminder: reminder.clone(),
            },
            &reminder.user_id,
        );

        if delivery.is_delivered() {
            return Ok(());
        }

        match self.user_repo.find_by_id(&reminder.user_id).await? {
            Some(user) => {
                self.email_service
                    .send_booking_reminder(&user, &reminder.message, &reminder.reminder_type)
                    .await
            }
            None => {
                tracing::warn!(
                    reminder_id = %reminder.reminder_id,
                    user_id = %reminder.user_id,
                    "Reminder user no longer exists"
                );
                Ok(())
            }
        }
    }

    /// Unread reminders for a user.
    pub async fn pending_for_user(&self, user_id: &str) -> Result<Vec<Reminder>, AppError> {
        self.reminder_repo.find_pending_for_user(user_id).await
    }

    /// Mark one of the user's reminders as read.
    pub async fn mark_read(&self, reminder_id: &str, user_id: &str) -> Result<(), AppError> {
        let pending = self.reminder_repo.find_pending_for_user(user_id).await?;
        if !pending.iter().any(|r| r.reminder_id == reminder_id) {
            return Err(AppError::NotFound("Reminder not found".to_string()));
        }

        self.reminder_repo.mark_read(reminder_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::domain::{EmailLog, EmailLogRepository, User};
    use crate::presentation::websocket::{PresenceRegistry, RoomTable};

    /// Reminder repository whose first mark_sent call fails.
    struct FlakyReminderRepo {
        due: Vec<Reminder>,
        marked: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ReminderRepository for FlakyReminderRepo {
        async fn create(&self, reminder: &Reminder) -> Result<Reminder, AppError> {
            Ok(reminder.clone())
        }

        async fn find_pending_for_user(&self, _user_id: &str) -> Result<Vec<Reminder>, AppError> {
            Ok(vec![])
        }

        async fn find_due(
            &self,
            _now: chrono::DateTime<Utc>,
        ) -> Result<Vec<Reminder>, AppError> {
            Ok(self.due.clone())
        }

        async fn mark_read(&self, _reminder_id: &str) -> Result<(), AppError> {
            Ok(())
        }

        async fn mark_sent(&self, reminder_id: &str) -> Result<(), AppError> {
            let mut marked = self.marked.lock().unwrap();
            marked.push(reminder_id.to_string());
            if marked.len() == 1 {
                Err(AppError::Internal("update failed".to_string()))
            } else {
                Ok(())
            }
        }
    }

    struct OfflineUserRepo;

    #[async_trait]
    impl UserRepository for OfflineUserRepo {
        async fn find_by_id(&self, _user_id: &str) -> Result<Option<User>, AppError> {
            Ok(None)
        }

        async fn find_by_email(&self, _email: &str) -> Result<Option<User>, AppError> {
            Ok(None)
        }

        async fn create(&self, user: &User) -> Result<User, AppError> {
            Ok(user.clone())
        }

        async fn update(&self, user: &User) -> Result<User, AppError> {
            Ok(user.clone())
        }

        async fn email_exists(&self, _email: &str) -> Result<bool, AppError> {
            Ok(false)
        }
    }

    struct StubEmailRepo;

    #[async_trait]
    impl EmailLogRepository for StubEmailRepo {
        async fn create(&self, email: &EmailLog) -> Result<EmailLog, AppError> {
            Ok(email.clone())
        }
    }

    fn due_reminder(id: &str) -> Reminder {
        Reminder {
            reminder_id: id.to_string(),
            user_id: "user_student".into(),
            booking_id: "booking_aa11bb22cc33".into(),
            reminder_time: Utc::now(),
            reminder_type: "1h".into(),
            message: "Your session starts soon.".into(),
            is_sent: false,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_one_failed_mark_does_not_abort_the_batch() {
        let repo = Arc::new(FlakyReminderRepo {
            due: vec![due_reminder("reminder_1"), due_reminder("reminder_2")],
            marked: Mutex::new(vec![]),
        });
        let service = ReminderService::new(
            repo.clone(),
            Arc::new(OfflineUserRepo),
            Arc::new(EmailNotificationService::new(Arc::new(StubEmailRepo))),
        );
        let router = EventRouter::new(
            Arc::new(PresenceRegistry::new()),
            Arc::new(RoomTable::new()),
        );

        let processed = service.process_due(&router).await.unwrap();

        assert_eq!(processed, 2);
        // Both reminders got a mark attempt despite the first one failing.
        assert_eq!(
            *repo.marked.lock().unwrap(),
            vec!["reminder_1".to_string(), "reminder_2".to_string()]
        );
    }
}
