//! Connection Session
//!
//! Per-connection state: the registrable send handle and the lifecycle state
//! machine (CONNECTING -> OPEN -> CLOSING -> CLOSED). Inbound frames are
//! dispatched single-threaded per session, strictly in arrival order.

use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use super::events::{InboundFrame, OutboundEvent};
use super::router::EventRouter;

/// Session lifecycle state.
///
/// OPEN is the only state in which inbound frames are processed. CLOSED is
/// terminal and triggers guarded unregistration from the presence registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionLifecycle {
    Connecting,
    Open,
    Closing,
    Closed,
}

/// The registrable half of a session: identity plus send path.
///
/// The `session_id` distinguishes successive connections of the same
/// identity, which is what makes the registry's stale-unregister guard
/// possible.
pub struct SessionHandle {
    identity: String,
    session_id: Uuid,
    sender: mpsc::UnboundedSender<OutboundEvent>,
}

impl SessionHandle {
    pub fn new(identity: String, sender: mpsc::UnboundedSender<OutboundEvent>) -> Self {
        Self {
            identity,
            session_id: Uuid::new_v4(),
            sender,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Enqueue an event on this session's send path.
    ///
    /// Non-blocking; returns false when the writer half is gone. The caller
    /// logs and moves on rather than retrying.
    pub fn send(&self, event: OutboundEvent) -> bool {
        self.sender.send(event).is_ok()
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("identity", &self.identity)
            .field("session_id", &self.session_id)
            .finish()
    }
}

/// One live connection's session: handle plus lifecycle state.
pub struct ConnectionSession {
    handle: Arc<SessionHandle>,
    state: SessionLifecycle,
}

impl ConnectionSession {
    /// Create a session in CONNECTING state for an accepted transport.
    pub fn new(identity: String, sender: mpsc::UnboundedSender<OutboundEvent>) -> Self {
        Self {
            handle: Arc::new(SessionHandle::new(identity, sender)),
            state: SessionLifecycle::Connecting,
        }
    }

    pub fn handle(&self) -> &Arc<SessionHandle> {
        &self.handle
    }

    pub fn state(&self) -> SessionLifecycle {
        self.state
    }

    /// CONNECTING -> OPEN: register with the presence registry and start
    /// accepting frames.
    pub fn open(&mut self, router: &EventRouter) {
        if self.state != SessionLifecycle::Connecting {
            return;
        }
        self.state = SessionLifecycle::Open;
        router.on_connect(Arc::clone(&self.handle));
        tracing::debug!(
            user_id = %self.handle.identity(),
            session_id = %self.handle.session_id(),
            "Session open"
        );
    }

    /// Handle one raw text frame from the transport.
    ///
    /// Malformed payloads are logged and dropped; they never close the
    /// session. Only transport-level failures (handled by the caller's read
    /// loop) are fatal.
    pub fn handle_text(&self, text: &str, router: &EventRouter) {
        if self.state != SessionLifecycle::Open {
            tracing::debug!(
                user_id = %self.handle.identity(),
                state = ?self.state,
                "Frame ignored outside OPEN state"
            );
            return;
        }

        match serde_json::from_str::<InboundFrame>(text) {
            Ok(frame) => self.dispatch(frame, router),
            Err(e) => {
                tracing::debug!(
                    user_id = %self.handle.identity(),
                    error = %e,
                    "Malformed frame dropped"
                );
            }
        }
    }

    /// Dispatch a decoded inbound frame.
    fn dispatch(&self, frame: InboundFrame, router: &EventRouter) {
        let identity = self.handle.identity();

        match frame {
            InboundFrame::Ping => {
                // Pong goes to the sender only, bypassing the registry.
                self.handle.send(OutboundEvent::Pong);
            }

            InboundFrame::JoinConversation { conversation_id } => {
                router.rooms().join(&conversation_id, identity);
            }

            InboundFrame::LeaveConversation { conversation_id } => {
                router.rooms().leave(&conversation_id, identity);
            }

            InboundFrame::Typing { conversation_id } => {
                router.broadcast_to_room(
                    OutboundEvent::UserTyping {
                        user_id: identity.to_string(),
                    },
                    &conversation_id,
                    Some(identity),
                );
            }

            InboundFrame::StopTyping { conversation_id } => {
                router.broadcast_to_room(
                    OutboundEvent::UserStopTyping {
                        user_id: identity.to_string(),
                    },
                    &conversation_id,
                    Some(identity),
                );
            }

            InboundFrame::Unrecognized => {
                tracing::debug!(user_id = %identity, "Unrecognized frame type dropped");
            }
        }
    }

    /// OPEN -> CLOSING -> CLOSED: unregister (handle-guarded) and finish.
    ///
    /// Idempotent; CLOSED is terminal.
    pub fn close(&mut self, router: &EventRouter) {
        if self.state == SessionLifecycle::Closed {
            return;
        }

        self.state = SessionLifecycle::Closing;
        router.on_disconnect(&self.handle);
        self.state = SessionLifecycle::Closed;

        tracing::debug!(
            user_id = %self.handle.identity(),
            session_id = %self.handle.session_id(),
            "Session closed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::websocket::presence::PresenceRegistry;
    use crate::presentation::websocket::rooms::RoomTable;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn router() -> EventRouter {
        EventRouter::new(
            Arc::new(PresenceRegistry::new()),
            Arc::new(RoomTable::new()),
        )
    }

    fn open_session(
        router: &EventRouter,
        identity: &str,
    ) -> (ConnectionSession, UnboundedReceiver<OutboundEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut session = ConnectionSession::new(identity.to_string(), tx);
        session.open(router);
        (session, rx)
    }

    #[test]
    fn test_lifecycle_connecting_open_closed() {
        let router = router();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut session = ConnectionSession::new("user_a".to_string(), tx);
        assert_eq!(session.state(), SessionLifecycle::Connecting);

        session.open(&router);
        assert_eq!(session.state(), SessionLifecycle::Open);
        assert!(router.presence().is_online("user_a"));

        session.close(&router);
        assert_eq!(session.state(), SessionLifecycle::Closed);
        assert!(!router.presence().is_online("user_a"));
    }

    #[test]
    fn test_close_is_idempotent() {
        let router = router();
        let (mut session, _rx) = open_session(&router, "user_a");

        session.close(&router);
        session.close(&router);

        assert_eq!(session.state(), SessionLifecycle::Closed);
    }

    #[test]
    fn test_ping_answered_with_pong_to_sender_only() {
        let router = router();
        let (session, mut rx) = open_session(&router, "user_a");
        let (_other, mut other_rx) = open_session(&router, "user_b");

        session.handle_text(r#"{"type": "ping"}"#, &router);

        assert!(matches!(rx.try_recv().unwrap(), OutboundEvent::Pong));
        assert!(other_rx.try_recv().is_err());
    }

    #[test]
    fn test_join_then_typing_reaches_other_member() {
        let router = router();
        let (session_a, mut rx_a) = open_session(&router, "user_a");
        let (session_b, mut rx_b) = open_session(&router, "user_b");

        session_a.handle_text(
            r#"{"type": "join_conversation", "conversation_id": "conv_1"}"#,
            &router,
        );
        session_b.handle_text(
            r#"{"type": "join_conversation", "conversation_id": "conv_1"}"#,
            &router,
        );
        session_a.handle_text(r#"{"type": "typing", "conversation_id": "conv_1"}"#, &router);

        match rx_b.try_recv().unwrap() {
            OutboundEvent::UserTyping { user_id } => assert_eq!(user_id, "user_a"),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(rx_a.try_recv().is_err());
    }

    #[test]
    fn test_leave_stops_typing_events() {
        let router = router();
        let (session_a, _rx_a) = open_session(&router, "user_a");
        let (session_b, mut rx_b) = open_session(&router, "user_b");
        router.rooms().join("conv_1", "user_a");
        router.rooms().join("conv_1", "user_b");

        session_b.handle_text(
            r#"{"type": "leave_conversation", "conversation_id": "conv_1"}"#,
            &router,
        );
        session_a.handle_text(r#"{"type": "typing", "conversation_id": "conv_1"}"#, &router);

        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn test_malformed_frame_keeps_session_open() {
        let router = router();
        let (session, mut rx) = open_session(&router, "user_a");

        session.handle_text("{not json", &router);
        session.handle_text(r#"{"type": "typing"}"#, &router); // missing field
        session.handle_text(r#"{"type": "something_else"}"#, &router);

        assert_eq!(session.state(), SessionLifecycle::Open);
        assert!(router.presence().is_online("user_a"));

        // Session still functional afterwards.
        session.handle_text(r#"{"type": "ping"}"#, &router);
        assert!(matches!(rx.try_recv().unwrap(), OutboundEvent::Pong));
    }

    #[test]
    fn test_frames_ignored_before_open() {
        let router = router();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let session = ConnectionSession::new("user_a".to_string(), tx);

        session.handle_text(r#"{"type": "ping"}"#, &router);

        assert!(rx.try_recv().is_err());
    }
}
