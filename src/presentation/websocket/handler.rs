//! WebSocket Connection Handler
//!
//! Owns the per-connection receive loop and the writer task. One tokio task
//! reads frames and feeds the session state machine; a second forwards
//! outbound events from the session's mpsc channel onto the socket.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use super::events::OutboundEvent;
use super::session::ConnectionSession;
use crate::startup::AppState;

/// WebSocket upgrade handler for `/ws/{user_id}`.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, user_id, state))
}

/// Handle one upgraded WebSocket connection until it disconnects.
async fn handle_socket(socket: WebSocket, user_id: String, state: AppState) {
    let (mut sink, mut stream) = socket.split();

    // Outbound events are enqueued on this channel by the router and the
    // session itself; the writer task serializes them onto the socket.
    let (tx, mut rx) = mpsc::unbounded_channel::<OutboundEvent>();

    let writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(t) => t,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize outbound event");
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let mut session = ConnectionSession::new(user_id.clone(), tx);
    session.open(&state.router);

    // Receive loop: frames are handled strictly in arrival order. Only
    // transport-level failures end the session; bad payloads are dropped
    // inside handle_text.
    while let Some(msg) = stream.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                session.handle_text(&text, &state.router);
            }
            Ok(Message::Close(_)) => {
                tracing::debug!(user_id = %user_id, "Client closed connection");
                break;
            }
            Ok(_) => {
                // Binary frames are not part of the protocol; ping/pong at
                // the websocket level are handled by axum itself.
            }
            Err(e) => {
                tracing::debug!(user_id = %user_id, error = %e, "WebSocket transport error");
                break;
            }
        }
    }

    session.close(&state.router);
    writer.abort();
}
