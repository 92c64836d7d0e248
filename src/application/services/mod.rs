//! Application Services
//!
//! Business logic orchestrating the domain repositories. Services stay
//! transport-agnostic; realtime delivery and its offline fallback are wired
//! together in the HTTP handlers and the reminder scheduler.

pub mod auth_service;
pub mod booking_service;
pub mod call_service;
pub mod email_service;
pub mod message_service;
pub mod reminder_service;

pub use auth_service::{AuthError, AuthService, Claims};
pub use booking_service::BookingService;
pub use call_service::CallService;
pub use email_service::EmailNotificationService;
pub use message_service::MessageService;
pub use reminder_service::ReminderService;
