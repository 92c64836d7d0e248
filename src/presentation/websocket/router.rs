//! Event Router
//!
//! Resolves a delivery target (single identity or room) to live connections
//! through the presence registry and room membership table, and enqueues the
//! event on each session's send path. An offline target is an expected,
//! non-exceptional outcome: direct delivery reports `Undeliverable` so the
//! caller can fall back to an offline notification, and room broadcasts
//! silently skip offline members.

use std::sync::Arc;

use super::events::OutboundEvent;
use super::presence::PresenceRegistry;
use super::rooms::RoomTable;
use super::session::SessionHandle;
use crate::infrastructure::metrics;

/// Outcome of a direct delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Event was enqueued on the target's live session
    Delivered,
    /// Target has no reachable session; caller may notify offline
    Undeliverable,
}

impl Delivery {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Delivery::Delivered)
    }
}

/// Routes outbound events to live connections.
pub struct EventRouter {
    presence: Arc<PresenceRegistry>,
    rooms: Arc<RoomTable>,
}

impl EventRouter {
    pub fn new(presence: Arc<PresenceRegistry>, rooms: Arc<RoomTable>) -> Self {
        Self { presence, rooms }
    }

    /// The presence registry backing this router.
    pub fn presence(&self) -> &PresenceRegistry {
        &self.presence
    }

    /// The room membership table backing this router.
    pub fn rooms(&self) -> &RoomTable {
        &self.rooms
    }

    /// Lifecycle hook: a session finished its handshake and is OPEN.
    pub fn on_connect(&self, handle: Arc<SessionHandle>) {
        self.presence.register(handle);
        metrics::set_active_connections(self.presence.connection_count());
    }

    /// Lifecycle hook: a session reached CLOSED.
    ///
    /// Unregistration is guarded by handle identity inside the registry, so
    /// a superseded session's teardown never evicts its replacement.
    pub fn on_disconnect(&self, handle: &SessionHandle) {
        self.presence.unregister(handle);
        metrics::set_active_connections(self.presence.connection_count());
    }

    /// Deliver an event to a single identity's live session.
    ///
    /// Returns `Undeliverable` when the identity has no registered session
    /// (or its send path is already torn down). Never an error.
    pub fn deliver_to_identity(&self, event: OutboundEvent, identity: &str) -> Delivery {
        let kind = event.kind();

        let delivery = match self.presence.resolve(identity) {
            Some(handle) => {
                if handle.send(event) {
                    Delivery::Delivered
                } else {
                    tracing::warn!(
                        user_id = %identity,
                        event = kind,
                        "Send path closed, treating as undeliverable"
                    );
                    Delivery::Undeliverable
                }
            }
            None => Delivery::Undeliverable,
        };

        metrics::record_delivery(kind, delivery.is_delivered());
        tracing::debug!(user_id = %identity, event = kind, outcome = ?delivery, "Direct delivery");
        delivery
    }

    /// Broadcast an event to every online member of a room, except the
    /// excluded identity.
    ///
    /// Offline members are skipped with no fallback; an individual send
    /// failure is logged and never aborts the remaining fan-out.
    pub fn broadcast_to_room(
        &self,
        event: OutboundEvent,
        room_id: &str,
        exclude_identity: Option<&str>,
    ) {
        let kind = event.kind();

        for member in self.rooms.members(room_id) {
            if exclude_identity == Some(member.as_str()) {
                continue;
            }

            if let Some(handle) = self.presence.resolve(&member) {
                if !handle.send(event.clone()) {
                    tracing::warn!(
                        user_id = %member,
                        room_id = %room_id,
                        event = kind,
                        "Broadcast send failed for one member"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn router() -> EventRouter {
        EventRouter::new(
            Arc::new(PresenceRegistry::new()),
            Arc::new(RoomTable::new()),
        )
    }

    fn connect(router: &EventRouter, identity: &str) -> UnboundedReceiver<OutboundEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        router.on_connect(Arc::new(SessionHandle::new(identity.to_string(), tx)));
        rx
    }

    #[test]
    fn test_direct_delivery_to_online_identity() {
        let router = router();
        let mut rx = connect(&router, "user_b");

        let delivery = router.deliver_to_identity(
            OutboundEvent::UserTyping {
                user_id: "user_a".into(),
            },
            "user_b",
        );

        assert_eq!(delivery, Delivery::Delivered);
        assert!(matches!(
            rx.try_recv().unwrap(),
            OutboundEvent::UserTyping { .. }
        ));
    }

    #[test]
    fn test_direct_delivery_to_offline_identity_is_undeliverable() {
        let router = router();

        let delivery = router.deliver_to_identity(OutboundEvent::Pong, "user_nobody");

        assert_eq!(delivery, Delivery::Undeliverable);
    }

    #[test]
    fn test_delivery_after_disconnect_is_undeliverable() {
        let router = router();
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = Arc::new(SessionHandle::new("user_b".to_string(), tx));
        router.on_connect(Arc::clone(&handle));
        router.on_disconnect(&handle);
        drop(rx);

        let delivery = router.deliver_to_identity(OutboundEvent::Pong, "user_b");

        assert_eq!(delivery, Delivery::Undeliverable);
    }

    #[test]
    fn test_broadcast_excludes_sender() {
        let router = router();
        let mut rx_a = connect(&router, "user_a");
        let mut rx_b = connect(&router, "user_b");
        router.rooms().join("conv_1", "user_a");
        router.rooms().join("conv_1", "user_b");

        router.broadcast_to_room(
            OutboundEvent::UserTyping {
                user_id: "user_a".into(),
            },
            "conv_1",
            Some("user_a"),
        );

        match rx_b.try_recv().unwrap() {
            OutboundEvent::UserTyping { user_id } => assert_eq!(user_id, "user_a"),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(rx_a.try_recv().is_err());
    }

    #[test]
    fn test_broadcast_skips_offline_members() {
        let router = router();
        let mut rx_b = connect(&router, "user_b");
        router.rooms().join("conv_1", "user_a");
        router.rooms().join("conv_1", "user_b");
        router.rooms().join("conv_1", "user_offline");

        router.broadcast_to_room(
            OutboundEvent::UserStopTyping {
                user_id: "user_a".into(),
            },
            "conv_1",
            None,
        );

        // Only the online members receive anything; no panic, no fallback.
        assert!(rx_b.try_recv().is_ok());
    }

    #[test]
    fn test_broadcast_survives_one_closed_send_path() {
        let router = router();
        let (dead_tx, dead_rx) = mpsc::unbounded_channel();
        router.on_connect(Arc::new(SessionHandle::new("user_dead".to_string(), dead_tx)));
        drop(dead_rx);
        let mut rx_b = connect(&router, "user_b");
        router.rooms().join("conv_1", "user_dead");
        router.rooms().join("conv_1", "user_b");

        router.broadcast_to_room(
            OutboundEvent::UserTyping {
                user_id: "user_a".into(),
            },
            "conv_1",
            None,
        );

        // Failure on the dead member does not abort delivery to user_b.
        assert!(rx_b.try_recv().is_ok());
    }

    #[test]
    fn test_reconnect_routes_to_newest_session() {
        let router = router();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let first = Arc::new(SessionHandle::new("user_a".to_string(), tx1));
        router.on_connect(Arc::clone(&first));

        // Reconnect with a fresh session, then the old one tears down.
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let second = Arc::new(SessionHandle::new("user_a".to_string(), tx2));
        router.on_connect(Arc::clone(&second));
        router.on_disconnect(&first);

        let delivery = router.deliver_to_identity(OutboundEvent::Pong, "user_a");

        assert_eq!(delivery, Delivery::Delivered);
        assert!(rx2.try_recv().is_ok());
        assert!(rx1.try_recv().is_err());
    }
}
