//! Booking Service
//!
//! Booking creation plus the reminders and confirmation email that come with
//! it. Every booking gets a 24-hour and a 1-hour reminder; reminders whose
//! time is already in the past are skipped.

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::application::dto::CreateBookingRequest;
use crate::application::services::email_service::EmailNotificationService;
use crate::domain::{
    Booking, BookingRepository, BookingStatus, Reminder, ReminderRepository, UserRepository,
    UserType,
};
use crate::shared::error::AppError;
use crate::shared::id::prefixed_id;

const DEFAULT_BOOKING_LIMIT: i64 = 50;

/// Booking operations.
pub struct BookingService {
    booking_repo: Arc<dyn BookingRepository>,
    reminder_repo: Arc<dyn ReminderRepository>,
    user_repo: Arc<dyn UserRepository>,
    email_service: Arc<EmailNotificationService>,
}

impl BookingService {
    pub fn new(
        booking_repo: Arc<dyn BookingRepository>,
        reminder_repo: Arc<dyn ReminderRepository>,
        user_repo: Arc<dyn UserRepository>,
        email_service: Arc<EmailNotificationService>,
    ) -> Self {
        Self {
            booking_repo,
            reminder_repo,
            user_repo,
            email_service,
        }
    }

    /// Book a session with a counselor.
    ///
    /// Creates the booking, schedules its reminders, and logs a confirmation
    /// email to the student.
    pub async fn create(
        &self,
        student_id: &str,
        request: CreateBookingRequest,
    ) -> Result<Booking, AppError> {
        let counselor = self
            .user_repo
            .find_by_id(&request.counselor_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Counselor not found".to_string()))?;

        if counselor.user_type != UserType::Counselor {
            return Err(AppError::BadRequest(
                "Selected user is not a counselor".to_string(),
            ));
        }

        if request.session_date <= Utc::now() {
            return Err(AppError::BadRequest(
                "Session date must be in the future".to_string(),
            ));
        }

        let booking = Booking {
            booking_id: prefixed_id("booking"),
            student_id: student_id.to_string(),
            counselor_id: counselor.user_id.clone(),
            service_name: request.service_name,
            session_date: request.session_date,
            duration_minutes: request.duration_minutes,
            status: BookingStatus::Pending,
            notes: request.notes,
            created_at: Utc::now(),
        };

        let stored = self.booking_repo.create(&booking).await?;

        // The booking row exists at this point; reminder scheduling and the
        // confirmation email are logged on failure, not returned.
        if let Err(e) = self.schedule_reminders(&stored).await {
            tracing::error!(
                booking_id = %stored.booking_id,
                error = %e,
                "Failed to schedule booking reminders"
            );
        }

        match self.user_repo.find_by_id(student_id).await {
            Ok(Some(student)) => {
                let session_date = stored.session_date.format("%Y-%m-%d %H:%M UTC").to_string();
                if let Err(e) = self
                    .email_service
                    .send_booking_confirmation(&student, &stored.service_name, &session_date)
                    .await
                {
                    tracing::error!(
                        booking_id = %stored.booking_id,
                        error = %e,
                        "Failed to log booking confirmation email"
                    );
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(
                    booking_id = %stored.booking_id,
                    error = %e,
                    "Failed to look up student for confirmation email"
                );
            }
        }

        Ok(stored)
    }

    /// Create the 24h and 1h reminders for a booking, skipping lead times
    /// that have already passed.
    async fn schedule_reminders(&self, booking: &Booking) -> Result<(), AppError> {
        let now = Utc::now();
        let leads = [("24h", Duration::hours(24)), ("1h", Duration::hours(1))];

        for (reminder_type, lead) in leads {
            let reminder_time = booking.session_date - lead;
            if reminder_time <= now {
                continue;
            }

            let reminder = Reminder {
                reminder_id: prefixed_id("reminder"),
                user_id: booking.student_id.clone(),
                booking_id: booking.booking_id.clone(),
                reminder_time,
                reminder_type: reminder_type.to_string(),
                message: format!(
                    "Your session \"{}\" starts at {}.",
                    booking.service_name,
                    booking.session_date.format("%Y-%m-%d %H:%M UTC")
                ),
                is_sent: false,
                is_read: false,
                created_at: now,
            };

            self.reminder_repo.create(&reminder).await?;
        }

        Ok(())
    }

    /// Bookings for a user as student or counselor.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Booking>, AppError> {
        self.booking_repo
            .find_for_user(user_id, DEFAULT_BOOKING_LIMIT)
            .await
    }

    /// Update booking status; only the two parties may do so.
    pub async fn update_status(
        &self,
        booking_id: &str,
        user_id: &str,
        status: &str,
    ) -> Result<Booking, AppError> {
        let booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        if booking.student_id != user_id && booking.counselor_id != user_id {
            return Err(AppError::Forbidden(
                "Not a party of this booking".to_string(),
            ));
        }

        let new_status = BookingStatus::parse(status)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown booking status: {}", status)))?;
        self.booking_repo
            .update_status(booking_id, new_status)
            .await?;

        self.booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::domain::{EmailLog, EmailLogRepository, User};

    struct StubBookingRepo {
        stored: Mutex<Option<Booking>>,
        status_updates: Mutex<Vec<BookingStatus>>,
    }

    impl StubBookingRepo {
        fn empty() -> Arc<Self> {
            Arc::new(Self {
                stored: Mutex::new(None),
                status_updates: Mutex::new(vec![]),
            })
        }

        fn with_booking(booking: Booking) -> Arc<Self> {
            Arc::new(Self {
                stored: Mutex::new(Some(booking)),
                status_updates: Mutex::new(vec![]),
            })
        }
    }

    #[async_trait]
    impl BookingRepository for StubBookingRepo {
        async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
            *self.stored.lock().unwrap() = Some(booking.clone());
            Ok(booking.clone())
        }

        async fn find_by_id(&self, _booking_id: &str) -> Result<Option<Booking>, AppError> {
            Ok(self.stored.lock().unwrap().clone())
        }

        async fn find_for_user(
            &self,
            _user_id: &str,
            _limit: i64,
        ) -> Result<Vec<Booking>, AppError> {
            Ok(vec![])
        }

        async fn update_status(
            &self,
            _booking_id: &str,
            status: BookingStatus,
        ) -> Result<(), AppError> {
            self.status_updates.lock().unwrap().push(status);
            Ok(())
        }
    }

    /// Reminder repository whose inserts always fail.
    struct FailingReminderRepo;

    #[async_trait]
    impl ReminderRepository for FailingReminderRepo {
        async fn create(&self, _reminder: &Reminder) -> Result<Reminder, AppError> {
            Err(AppError::Internal("reminder insert failed".to_string()))
        }

        async fn find_pending_for_user(&self, _user_id: &str) -> Result<Vec<Reminder>, AppError> {
            Ok(vec![])
        }

        async fn find_due(
            &self,
            _now: chrono::DateTime<Utc>,
        ) -> Result<Vec<Reminder>, AppError> {
            Ok(vec![])
        }

        async fn mark_read(&self, _reminder_id: &str) -> Result<(), AppError> {
            Ok(())
        }

        async fn mark_sent(&self, _reminder_id: &str) -> Result<(), AppError> {
            Ok(())
        }
    }

    /// Email log repository whose inserts always fail.
    struct FailingEmailRepo;

    #[async_trait]
    impl EmailLogRepository for FailingEmailRepo {
        async fn create(&self, _email: &EmailLog) -> Result<EmailLog, AppError> {
            Err(AppError::Internal("email insert failed".to_string()))
        }
    }

    struct StubUserRepo;

    #[async_trait]
    impl UserRepository for StubUserRepo {
        async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, AppError> {
            let user_type = if user_id.starts_with("counselor") {
                UserType::Counselor
            } else {
                UserType::Student
            };
            Ok(Some(User {
                user_id: user_id.to_string(),
                email: format!("{}@example.com", user_id),
                password_hash: "hash".into(),
                full_name: "Test User".into(),
                user_type,
                phone: None,
                country: None,
                timezone: None,
                avatar_url: None,
                is_active: true,
                created_at: Utc::now(),
            }))
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

    fn service_with(booking_repo: Arc<StubBookingRepo>) -> BookingService {
        BookingService::new(
            booking_repo,
            Arc::new(FailingReminderRepo),
            Arc::new(StubUserRepo),
            Arc::new(EmailNotificationService::new(Arc::new(FailingEmailRepo))),
        )
    }

    fn booking_request() -> CreateBookingRequest {
        CreateBookingRequest {
            counselor_id: "counselor_1".into(),
            service_name: "University Application Review".into(),
            session_date: Utc::now() + Duration::days(3),
            duration_minutes: 60,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_succeeds_when_reminders_and_email_fail() {
        let booking_repo = StubBookingRepo::empty();
        let service = service_with(booking_repo.clone());

        let booking = service
            .create("user_student", booking_request())
            .await
            .unwrap();

        assert_eq!(booking.status, BookingStatus::Pending);
        assert!(booking_repo.stored.lock().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unknown_status_string_is_rejected() {
        let booking = Booking {
            booking_id: "booking_aa11bb22cc33".into(),
            student_id: "user_student".into(),
            counselor_id: "counselor_1".into(),
            service_name: "University Application Review".into(),
            session_date: Utc::now() + Duration::days(3),
            duration_minutes: 60,
            status: BookingStatus::Confirmed,
            notes: None,
            created_at: Utc::now(),
        };
        let booking_repo = StubBookingRepo::with_booking(booking);
        let service = service_with(booking_repo.clone());

        let result = service
            .update_status("booking_aa11bb22cc33", "user_student", "garbage")
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert!(booking_repo.status_updates.lock().unwrap().is_empty());
    }
}
