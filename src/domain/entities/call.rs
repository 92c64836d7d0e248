//! Call session entity and repository trait.
//!
//! A call session is the persisted record of an audio/video call; the actual
//! media negotiation happens client-side over WebRTC, with offer/answer/ICE
//! payloads relayed through the realtime layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Call media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallType {
    Audio,
    Video,
}

impl CallType {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "video" => Self::Video,
            _ => Self::Audio,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }
}

impl std::fmt::Display for CallType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Call lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Ringing,
    Accepted,
    Declined,
    Ended,
    Missed,
}

impl CallStatus {
    /// Lenient mapping for status strings read back from the database.
    pub fn from_str(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::Ringing)
    }

    /// Strict parsing for client-supplied status strings.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ringing" => Some(Self::Ringing),
            "accepted" => Some(Self::Accepted),
            "declined" => Some(Self::Declined),
            "ended" => Some(Self::Ended),
            "missed" => Some(Self::Missed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ringing => "ringing",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Ended => "ended",
            Self::Missed => "missed",
        }
    }

    /// Whether this status terminates the call.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Declined | Self::Ended | Self::Missed)
    }
}

impl std::fmt::Display for CallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A call between two users. Maps to the `call_sessions` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSession {
    /// Prefixed string id (`call_<hex>`)
    pub call_id: String,

    pub caller_id: String,

    pub receiver_id: String,

    pub call_type: CallType,

    pub status: CallStatus,

    /// Set when the call is accepted
    pub started_at: Option<DateTime<Utc>>,

    /// Set when the call reaches a terminal status
    pub ended_at: Option<DateTime<Utc>>,

    /// Computed from started_at/ended_at when the call ends
    pub duration_seconds: Option<i32>,

    pub created_at: DateTime<Utc>,
}

impl CallSession {
    /// Check whether a user is one of the two parties.
    pub fn involves(&self, user_id: &str) -> bool {
        self.caller_id == user_id || self.receiver_id == user_id
    }

    /// The other party relative to `user_id`. Caller must be a party.
    pub fn other_party(&self, user_id: &str) -> &str {
        if self.caller_id == user_id {
            &self.receiver_id
        } else {
            &self.caller_id
        }
    }
}

/// Repository trait for call session data access operations.
#[async_trait]
pub trait CallRepository: Send + Sync {
    /// Create a new call session.
    async fn create(&self, call: &CallSession) -> Result<CallSession, AppError>;

    /// Find a call session by id.
    async fn find_by_id(&self, call_id: &str) -> Result<Option<CallSession>, AppError>;

    /// Update an existing call session (full-row update keyed by call_id).
    async fn update(&self, call: &CallSession) -> Result<CallSession, AppError>;

    /// Call history for a user (as caller or receiver), newest first.
    async fn find_for_user(&self, user_id: &str, limit: i64)
        -> Result<Vec<CallSession>, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_call() -> CallSession {
        CallSession {
            call_id: "call_aa11bb22cc33".into(),
            caller_id: "user_caller".into(),
            receiver_id: "user_receiver".into(),
            call_type: CallType::Video,
            status: CallStatus::Ringing,
            started_at: None,
            ended_at: None,
            duration_seconds: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_other_party() {
        let call = test_call();
        assert_eq!(call.other_party("user_caller"), "user_receiver");
        assert_eq!(call.other_party("user_receiver"), "user_caller");
    }

    #[test]
    fn test_involves() {
        let call = test_call();
        assert!(call.involves("user_caller"));
        assert!(call.involves("user_receiver"));
        assert!(!call.involves("user_stranger"));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!CallStatus::Ringing.is_terminal());
        assert!(!CallStatus::Accepted.is_terminal());
        assert!(CallStatus::Declined.is_terminal());
        assert!(CallStatus::Ended.is_terminal());
        assert!(CallStatus::Missed.is_terminal());
    }

    #[test]
    fn test_parse_rejects_unknown_status() {
        assert_eq!(CallStatus::parse("garbage"), None);
        assert_eq!(CallStatus::parse(""), None);
        assert_eq!(CallStatus::parse("ACCEPTED"), Some(CallStatus::Accepted));
    }

    #[test]
    fn test_call_status_roundtrip() {
        for status in [
            CallStatus::Ringing,
            CallStatus::Accepted,
            CallStatus::Declined,
            CallStatus::Ended,
            CallStatus::Missed,
        ] {
            assert_eq!(CallStatus::from_str(status.as_str()), status);
        }
    }
}
