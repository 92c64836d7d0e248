//! Repository Implementations
//!
//! PostgreSQL implementations of the domain repository traits.

pub mod booking_repository;
pub mod call_repository;
pub mod conversation_repository;
pub mod email_log_repository;
pub mod file_repository;
pub mod message_repository;
pub mod reminder_repository;
pub mod user_repository;

pub use booking_repository::PgBookingRepository;
pub use call_repository::PgCallRepository;
pub use conversation_repository::PgConversationRepository;
pub use email_log_repository::PgEmailLogRepository;
pub use file_repository::PgFileRepository;
pub use message_repository::PgMessageRepository;
pub use reminder_repository::PgReminderRepository;
pub use user_repository::PgUserRepository;
