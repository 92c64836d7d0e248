//! Booking Repository Implementation
//!
//! PostgreSQL implementation of the BookingRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Booking, BookingRepository, BookingStatus};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    booking_id: String,
    student_id: String,
    counselor_id: String,
    service_name: String,
    session_date: DateTime<Utc>,
    duration_minutes: i32,
    status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl BookingRow {
    fn into_booking(self) -> Booking {
        Booking {
            booking_id: self.booking_id,
            student_id: self.student_id,
            counselor_id: self.counselor_id,
            service_name: self.service_name,
            session_date: self.session_date,
            duration_minutes: self.duration_minutes,
            status: BookingStatus::from_str(&self.status),
            notes: self.notes,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL booking repository implementation.
#[derive(Clone)]
pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        let row = sqlx::query_as::<_, BookingRow>(
            r#"
            INSERT INTO bookings (booking_id, student_id, counselor_id, service_name,
                                  session_date, duration_minutes, status, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING booking_id, student_id, counselor_id, service_name,
                      session_date, duration_minutes, status, notes, created_at
            "#,
        )
        .bind(&booking.booking_id)
        .bind(&booking.student_id)
        .bind(&booking.counselor_id)
        .bind(&booking.service_name)
        .bind(booking.session_date)
        .bind(booking.duration_minutes)
        .bind(booking.status.as_str())
        .bind(&booking.notes)
        .bind(booking.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_booking())
    }

    async fn find_by_id(&self, booking_id: &str) -> Result<Option<Booking>, AppError> {
        let row = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT booking_id, student_id, counselor_id, service_name,
                   session_date, duration_minutes, status, notes, created_at
            FROM bookings
            WHERE booking_id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_booking()))
    }

    /// Bookings where the user is the student or the counselor, upcoming first.
    async fn find_for_user(&self, user_id: &str, limit: i64) -> Result<Vec<Booking>, AppError> {
        let rows = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT booking_id, student_id, counselor_id, service_name,
                   session_date, duration_minutes, status, notes, created_at
            FROM bookings
            WHERE student_id = $1 OR counselor_id = $1
            ORDER BY session_date DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_booking()).collect())
    }

    async fn update_status(
        &self,
        booking_id: &str,
        status: BookingStatus,
    ) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE bookings SET status = $2 WHERE booking_id = $1")
            .bind(booking_id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Booking not found".to_string()));
        }

        Ok(())
    }
}
