//! Booking Handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use crate::application::dto::CreateBookingRequest;
use crate::application::services::{BookingService, EmailNotificationService};
use crate::domain::Booking;
use crate::infrastructure::repositories::{
    PgBookingRepository, PgEmailLogRepository, PgReminderRepository, PgUserRepository,
};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct UpdateBookingStatusRequest {
    /// "confirmed", "cancelled", or "completed"
    pub status: String,
}

fn booking_service(state: &AppState) -> BookingService {
    BookingService::new(
        Arc::new(PgBookingRepository::new(state.db.clone())),
        Arc::new(PgReminderRepository::new(state.db.clone())),
        Arc::new(PgUserRepository::new(state.db.clone())),
        Arc::new(EmailNotificationService::new(Arc::new(
            PgEmailLogRepository::new(state.db.clone()),
        ))),
    )
}

/// Book a counseling session
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let booking = booking_service(&state)
        .create(&auth_user.user_id, body)
        .await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

/// List the authenticated user's bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = booking_service(&state)
        .list_for_user(&auth_user.user_id)
        .await?;

    Ok(Json(bookings))
}

/// Update booking status
pub async fn update_booking_status(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(booking_id): Path<String>,
    Json(body): Json<UpdateBookingStatusRequest>,
) -> Result<Json<Booking>, AppError> {
    let booking = booking_service(&state)
        .update_status(&booking_id, &auth_user.user_id, &body.status)
        .await?;

    Ok(Json(booking))
}
