//! Request DTOs
//!
//! Data structures for API request bodies.

use serde::Deserialize;
use validator::Validate;

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 2, max = 255, message = "Full name must be 2-255 characters"))]
    pub full_name: String,

    /// "student" (default), "counselor", or "admin"
    pub user_type: Option<String>,

    pub phone: Option<String>,
    pub country: Option<String>,
    pub timezone: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Update profile request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 255, message = "Full name must be 2-255 characters"))]
    pub full_name: Option<String>,

    pub phone: Option<String>,
    pub country: Option<String>,
    pub timezone: Option<String>,
    pub avatar_url: Option<String>,
}

/// Change password request
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    pub current_password: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Send message request
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    pub receiver_id: String,

    #[validate(length(min = 1, max = 4000, message = "Content must be 1-4000 characters"))]
    pub content: String,

    pub file_url: Option<String>,
    pub file_name: Option<String>,
}

/// Initiate call request
#[derive(Debug, Deserialize)]
pub struct InitiateCallRequest {
    pub receiver_id: String,

    /// "audio" or "video"
    pub call_type: String,
}

/// Update call status request
#[derive(Debug, Deserialize)]
pub struct UpdateCallStatusRequest {
    /// "accepted", "declined", "ended", or "missed"
    pub status: String,
}

/// WebRTC signal relay request
#[derive(Debug, Deserialize)]
pub struct SignalRequest {
    /// "offer", "answer", or "ice_candidate"
    #[serde(rename = "type")]
    pub signal_type: String,

    /// Opaque SDP or ICE payload, relayed verbatim
    pub data: serde_json::Value,
}

/// Create booking request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub counselor_id: String,

    #[validate(length(min = 1, max = 255, message = "Service name must be 1-255 characters"))]
    pub service_name: String,

    pub session_date: chrono::DateTime<chrono::Utc>,

    #[validate(range(min = 15, max = 240, message = "Duration must be 15-240 minutes"))]
    pub duration_minutes: i32,

    pub notes: Option<String>,
}
