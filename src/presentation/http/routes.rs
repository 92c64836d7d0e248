//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::auth_middleware;
use crate::presentation::websocket::ws_handler;
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes(state.clone()))
        // Realtime endpoint; the user id in the path is the presence identity
        .route("/ws/{user_id}", get(ws_handler))
        .route("/", get(root))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

async fn root() -> impl IntoResponse {
    "EduAdvise API"
}

/// Prometheus metrics endpoint
async fn metrics_handler() -> impl IntoResponse {
    metrics::gather_metrics()
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness))
        .merge(auth_routes(state.clone()))
        .merge(protected_routes(state))
}

fn auth_routes(state: AppState) -> Router<AppState> {
    // Public endpoints plus the token-protected account endpoints.
    let protected = Router::new()
        .route(
            "/auth/me",
            get(handlers::auth::me).patch(handlers::auth::update_profile),
        )
        .route("/auth/change-password", post(handlers::auth::change_password))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .merge(protected)
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Messaging
        .route("/messages", post(handlers::message::send_message))
        .route("/conversations", get(handlers::message::list_conversations))
        .route(
            "/conversations/{conversation_id}/messages",
            get(handlers::message::conversation_messages),
        )
        // Calls and WebRTC signaling
        .route("/calls", post(handlers::call::initiate_call))
        .route("/calls/history", get(handlers::call::call_history))
        .route("/calls/webrtc-config", get(handlers::call::webrtc_config))
        .route(
            "/calls/{call_id}/status",
            patch(handlers::call::update_call_status),
        )
        .route("/calls/{call_id}/signal", post(handlers::call::relay_signal))
        // Bookings
        .route(
            "/bookings",
            post(handlers::booking::create_booking).get(handlers::booking::list_bookings),
        )
        .route(
            "/bookings/{booking_id}/status",
            patch(handlers::booking::update_booking_status),
        )
        // Reminders
        .route("/reminders", get(handlers::reminder::list_reminders))
        .route(
            "/reminders/{reminder_id}/read",
            post(handlers::reminder::mark_reminder_read),
        )
        // Files
        .route("/files", post(handlers::file::upload_file))
        .route("/files/{stored_name}", get(handlers::file::download_file))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
