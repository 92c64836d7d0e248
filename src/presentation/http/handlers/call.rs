//! Call Handlers
//!
//! Call setup and WebRTC signal relay. Initiating a call pushes an
//! `incoming_call` event to the receiver, with an email fallback when they
//! are offline. Status updates and WebRTC signals are relayed to the other
//! party with no fallback; a signal for an offline peer is simply lost, and
//! the call will fail at the WebRTC layer.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::application::dto::{
    InitiateCallRequest, SignalRequest, UpdateCallStatusRequest, WebRtcConfigResponse,
};
use crate::application::services::{CallService, EmailNotificationService};
use crate::domain::CallSession;
use crate::infrastructure::repositories::{
    PgCallRepository, PgEmailLogRepository, PgUserRepository,
};
use crate::presentation::middleware::AuthUser;
use crate::presentation::websocket::OutboundEvent;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn call_service(state: &AppState) -> CallService {
    CallService::new(
        Arc::new(PgCallRepository::new(state.db.clone())),
        Arc::new(PgUserRepository::new(state.db.clone())),
    )
}

/// Initiate a call
pub async fn initiate_call(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<InitiateCallRequest>,
) -> Result<(StatusCode, Json<CallSession>), AppError> {
    let service = call_service(&state);
    let (call, receiver) = service
        .initiate(&auth_user.user_id, &body.receiver_id, &body.call_type)
        .await?;

    let caller = service.get_user(&auth_user.user_id).await?;

    let delivery = state.router.deliver_to_identity(
        OutboundEvent::IncomingCall {
            call_id: call.call_id.clone(),
            caller_id: call.caller_id.clone(),
            caller_name: caller.full_name.clone(),
            call_type: call.call_type,
        },
        &receiver.user_id,
    );

    if !delivery.is_delivered() {
        let email_service =
            EmailNotificationService::new(Arc::new(PgEmailLogRepository::new(state.db.clone())));

        if let Err(e) = email_service
            .send_incoming_call_notification(
                &receiver,
                &caller.full_name,
                call.call_type.as_str(),
            )
            .await
        {
            tracing::error!(call_id = %call.call_id, error = %e, "Missed-call email failed");
        }
    }

    Ok((StatusCode::CREATED, Json(call)))
}

/// Update call status (accept, decline, end)
pub async fn update_call_status(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(call_id): Path<String>,
    Json(body): Json<UpdateCallStatusRequest>,
) -> Result<Json<CallSession>, AppError> {
    let call = call_service(&state)
        .update_status(&call_id, &auth_user.user_id, &body.status)
        .await?;

    // Relay to the other party; no fallback for call control events.
    state.router.deliver_to_identity(
        OutboundEvent::CallStatusUpdate {
            call_id: call.call_id.clone(),
            status: call.status,
        },
        call.other_party(&auth_user.user_id),
    );

    Ok(Json(call))
}

/// Relay a WebRTC offer/answer/ICE payload to the other party
pub async fn relay_signal(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(call_id): Path<String>,
    Json(body): Json<SignalRequest>,
) -> Result<StatusCode, AppError> {
    let call = call_service(&state)
        .get_for_party(&call_id, &auth_user.user_id)
        .await?;

    state.router.deliver_to_identity(
        OutboundEvent::WebrtcSignal {
            call_id: call.call_id.clone(),
            signal_type: body.signal_type,
            data: body.data,
        },
        call.other_party(&auth_user.user_id),
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Call history for the authenticated user
pub async fn call_history(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<CallSession>>, AppError> {
    let calls = call_service(&state).history(&auth_user.user_id).await?;
    Ok(Json(calls))
}

/// ICE server configuration for client-side WebRTC setup
pub async fn webrtc_config(State(state): State<AppState>) -> Json<WebRtcConfigResponse> {
    Json(WebRtcConfigResponse {
        ice_servers: state.settings.webrtc.ice_servers.clone(),
    })
}
