//! Realtime Wire Types
//!
//! JSON frame formats for the WebSocket connection. Both directions use a
//! `type` tag; inbound frames with an unknown tag decode to `Unrecognized`
//! and are dropped without closing the connection.

use serde::{Deserialize, Serialize};

use crate::domain::{CallStatus, CallType, Message, Reminder};

/// Frame received from a client.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundFrame {
    /// Liveness probe; answered with `pong` to the sender only
    Ping,

    /// Subscribe to a conversation's room for typing events
    JoinConversation { conversation_id: String },

    /// Unsubscribe from a conversation's room
    LeaveConversation { conversation_id: String },

    /// Broadcast `user_typing` to the rest of the room
    Typing { conversation_id: String },

    /// Broadcast `user_stop_typing` to the rest of the room
    StopTyping { conversation_id: String },

    /// Any frame with a tag we do not know; ignored, never fatal
    #[serde(other)]
    Unrecognized,
}

/// Event pushed to a client.
///
/// Direct events (`new_message`, `incoming_call`, `call_status_update`,
/// `webrtc_signal`, `reminder`) are routed to a single identity; typing
/// events are room broadcasts; `pong` only ever goes back to the pinging
/// session.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundEvent {
    NewMessage {
        message: Message,
    },
    UserTyping {
        user_id: String,
    },
    UserStopTyping {
        user_id: String,
    },
    IncomingCall {
        call_id: String,
        caller_id: String,
        caller_name: String,
        call_type: CallType,
    },
    CallStatusUpdate {
        call_id: String,
        status: CallStatus,
    },
    WebrtcSignal {
        call_id: String,
        signal_type: String,
        data: serde_json::Value,
    },
    Reminder {
        reminder: Reminder,
    },
    Pong,
}

impl OutboundEvent {
    /// Event kind label, used for logging and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            OutboundEvent::NewMessage { .. } => "new_message",
            OutboundEvent::UserTyping { .. } => "user_typing",
            OutboundEvent::UserStopTyping { .. } => "user_stop_typing",
            OutboundEvent::IncomingCall { .. } => "incoming_call",
            OutboundEvent::CallStatusUpdate { .. } => "call_status_update",
            OutboundEvent::WebrtcSignal { .. } => "webrtc_signal",
            OutboundEvent::Reminder { .. } => "reminder",
            OutboundEvent::Pong => "pong",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_ping() {
        let frame: InboundFrame = serde_json::from_str(r#"{"type": "ping"}"#).unwrap();
        assert!(matches!(frame, InboundFrame::Ping));
    }

    #[test]
    fn test_parse_join_conversation() {
        let frame: InboundFrame =
            serde_json::from_str(r#"{"type": "join_conversation", "conversation_id": "conv_1"}"#)
                .unwrap();
        match frame {
            InboundFrame::JoinConversation { conversation_id } => {
                assert_eq!(conversation_id, "conv_1");
            }
            other => panic!("unexpected frame: {:?}", other),
        }
    }

    #[test]
    fn test_parse_typing() {
        let frame: InboundFrame =
            serde_json::from_str(r#"{"type": "typing", "conversation_id": "conv_9"}"#).unwrap();
        assert!(matches!(frame, InboundFrame::Typing { .. }));
    }

    #[test]
    fn test_unknown_tag_is_unrecognized_not_error() {
        let frame: InboundFrame =
            serde_json::from_str(r#"{"type": "upload_telemetry", "blob": 42}"#).unwrap();
        assert!(matches!(frame, InboundFrame::Unrecognized));
    }

    #[test]
    fn test_known_tag_with_missing_fields_is_an_error() {
        // Malformed payloads are a decode error; the session logs and drops them.
        let result: Result<InboundFrame, _> = serde_json::from_str(r#"{"type": "typing"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_pong_wire_shape() {
        let json = serde_json::to_value(&OutboundEvent::Pong).unwrap();
        assert_eq!(json, serde_json::json!({"type": "pong"}));
    }

    #[test]
    fn test_user_typing_wire_shape() {
        let json = serde_json::to_value(&OutboundEvent::UserTyping {
            user_id: "user_abc".into(),
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "user_typing", "user_id": "user_abc"})
        );
    }

    #[test]
    fn test_webrtc_signal_wire_shape() {
        let json = serde_json::to_value(&OutboundEvent::WebrtcSignal {
            call_id: "call_1".into(),
            signal_type: "offer".into(),
            data: serde_json::json!({"sdp": "v=0"}),
        })
        .unwrap();
        assert_eq!(json["type"], "webrtc_signal");
        assert_eq!(json["signal_type"], "offer");
        assert_eq!(json["data"]["sdp"], "v=0");
    }

    #[test]
    fn test_event_kind_labels() {
        assert_eq!(OutboundEvent::Pong.kind(), "pong");
        assert_eq!(
            OutboundEvent::UserStopTyping {
                user_id: "u".into()
            }
            .kind(),
            "user_stop_typing"
        );
    }
}
