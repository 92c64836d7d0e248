//! Configuration Management
//!
//! Loads and validates application configuration.

mod settings;

pub use settings::{
    CorsSettings, DatabaseSettings, IceServer, JwtSettings, ReminderSettings, ServerSettings,
    Settings, UploadSettings, WebRtcSettings, MIN_JWT_SECRET_LENGTH,
};
