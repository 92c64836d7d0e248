//! Response DTOs
//!
//! Data structures for API response bodies.

use serde::Serialize;

use crate::domain::{Conversation, Message, User};

/// Authentication response: token plus the authenticated user
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub user: User,
}

/// Conversation list entry with preview data
#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    #[serde(flatten)]
    pub conversation: Conversation,

    /// Most recent message, if any
    pub last_message: Option<Message>,

    /// Unread count for the requesting user
    pub unread_count: i64,
}

/// Uploaded file metadata with its download URL
#[derive(Debug, Serialize)]
pub struct UploadedFileResponse {
    pub file_id: String,
    pub original_name: String,
    pub stored_name: String,
    pub size: i64,
    pub content_type: String,
    pub url: String,
}

/// ICE server list for client-side WebRTC setup.
///
/// Field name matches the RTCPeerConnection configuration key.
#[derive(Debug, Serialize)]
pub struct WebRtcConfigResponse {
    #[serde(rename = "iceServers")]
    pub ice_servers: Vec<crate::config::IceServer>,
}
