//! Realtime Layer Scenario Tests
//!
//! End-to-end scenarios over the public realtime API: sessions, presence,
//! rooms, and event routing, without a running server or database.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver};

use eduadvise_server::presentation::websocket::{
    ConnectionSession, Delivery, EventRouter, OutboundEvent, PresenceRegistry, RoomTable,
    SessionLifecycle,
};

fn new_router() -> EventRouter {
    EventRouter::new(Arc::new(PresenceRegistry::new()), Arc::new(RoomTable::new()))
}

fn open_session(
    router: &EventRouter,
    user_id: &str,
) -> (ConnectionSession, UnboundedReceiver<OutboundEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut session = ConnectionSession::new(user_id.to_string(), tx);
    session.open(router);
    (session, rx)
}

#[test]
fn connect_join_type_disconnect_full_flow() {
    let router = new_router();
    let (session_a, _rx_a) = open_session(&router, "user_a");
    let (mut session_b, mut rx_b) = open_session(&router, "user_b");

    assert!(router.presence().is_online("user_a"));
    assert!(router.presence().is_online("user_b"));

    session_a.handle_text(
        r#"{"type": "join_conversation", "conversation_id": "conv_x"}"#,
        &router,
    );
    session_b.handle_text(
        r#"{"type": "join_conversation", "conversation_id": "conv_x"}"#,
        &router,
    );
    session_a.handle_text(r#"{"type": "typing", "conversation_id": "conv_x"}"#, &router);

    match rx_b.try_recv().expect("user_b should receive typing event") {
        OutboundEvent::UserTyping { user_id } => assert_eq!(user_id, "user_a"),
        other => panic!("unexpected event: {:?}", other),
    }

    session_b.close(&router);
    assert_eq!(session_b.state(), SessionLifecycle::Closed);
    assert!(!router.presence().is_online("user_b"));

    // Room membership is not pruned on disconnect; user_b is simply skipped.
    assert!(router.rooms().members("conv_x").contains(&"user_b".to_string()));
    session_a.handle_text(r#"{"type": "typing", "conversation_id": "conv_x"}"#, &router);
    assert!(rx_b.try_recv().is_err());
}

#[test]
fn reconnect_supersedes_old_session_without_eviction_race() {
    let router = new_router();
    let (mut old_session, mut old_rx) = open_session(&router, "user_a");
    let (_new_session, mut new_rx) = open_session(&router, "user_a");

    // The stale session's teardown must not evict the replacement.
    old_session.close(&router);

    assert!(router.presence().is_online("user_a"));
    let delivery = router.deliver_to_identity(OutboundEvent::Pong, "user_a");
    assert_eq!(delivery, Delivery::Delivered);
    assert!(new_rx.try_recv().is_ok());
    assert!(old_rx.try_recv().is_err());
}

#[test]
fn direct_delivery_reports_offline_target_for_fallback() {
    let router = new_router();
    let (mut session, _rx) = open_session(&router, "user_a");
    session.close(&router);

    let delivery = router.deliver_to_identity(
        OutboundEvent::UserTyping {
            user_id: "user_b".into(),
        },
        "user_a",
    );

    assert_eq!(delivery, Delivery::Undeliverable);
}

#[test]
fn malformed_and_unknown_frames_never_end_the_session() {
    let router = new_router();
    let (session, mut rx) = open_session(&router, "user_a");

    session.handle_text("garbage", &router);
    session.handle_text(r#"{"type": "join_conversation"}"#, &router);
    session.handle_text(r#"{"type": "made_up_frame", "extra": 1}"#, &router);

    assert_eq!(session.state(), SessionLifecycle::Open);
    session.handle_text(r#"{"type": "ping"}"#, &router);
    assert!(matches!(rx.try_recv().unwrap(), OutboundEvent::Pong));
}

#[test]
fn outbound_events_use_snake_case_type_tags() {
    let json = serde_json::to_value(&OutboundEvent::UserStopTyping {
        user_id: "user_a".into(),
    })
    .unwrap();

    assert_eq!(json["type"], "user_stop_typing");
    assert_eq!(json["user_id"], "user_a");
}

#[test]
fn room_join_is_idempotent_and_leave_is_tolerant() {
    let router = new_router();
    let (session, _rx) = open_session(&router, "user_a");

    session.handle_text(
        r#"{"type": "join_conversation", "conversation_id": "conv_x"}"#,
        &router,
    );
    session.handle_text(
        r#"{"type": "join_conversation", "conversation_id": "conv_x"}"#,
        &router,
    );
    assert_eq!(router.rooms().member_count("conv_x"), 1);

    session.handle_text(
        r#"{"type": "leave_conversation", "conversation_id": "conv_x"}"#,
        &router,
    );
    // Leaving a room you are not in is a no-op.
    session.handle_text(
        r#"{"type": "leave_conversation", "conversation_id": "conv_x"}"#,
        &router,
    );
    assert_eq!(router.rooms().member_count("conv_x"), 0);
}
