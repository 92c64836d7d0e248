//! Booking entity and repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Booking lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Lenient mapping for status strings read back from the database.
    pub fn from_str(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::Pending)
    }

    /// Strict parsing for client-supplied status strings.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "cancelled" => Some(Self::Cancelled),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}

/// A booked counseling session. Maps to the `bookings` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Prefixed string id (`booking_<hex>`)
    pub booking_id: String,

    pub student_id: String,

    pub counselor_id: String,

    pub service_name: String,

    /// Scheduled start of the session
    pub session_date: DateTime<Utc>,

    pub duration_minutes: i32,

    pub status: BookingStatus,

    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Repository trait for Booking data access operations.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Create a new booking.
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;

    /// Find a booking by id.
    async fn find_by_id(&self, booking_id: &str) -> Result<Option<Booking>, AppError>;

    /// Bookings where the user is the student or the counselor, upcoming first.
    async fn find_for_user(&self, user_id: &str, limit: i64) -> Result<Vec<Booking>, AppError>;

    /// Update booking status.
    async fn update_status(&self, booking_id: &str, status: BookingStatus)
        -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_status_roundtrip() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
            BookingStatus::Completed,
        ] {
            assert_eq!(BookingStatus::from_str(status.as_str()), status);
        }
    }

    #[test]
    fn test_booking_status_unknown_defaults_to_pending() {
        assert_eq!(BookingStatus::from_str("rescheduled"), BookingStatus::Pending);
    }

    #[test]
    fn test_parse_rejects_unknown_status() {
        assert_eq!(BookingStatus::parse("rescheduled"), None);
        assert_eq!(
            BookingStatus::parse("Confirmed"),
            Some(BookingStatus::Confirmed)
        );
    }
}
