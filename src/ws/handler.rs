//! Axum WebSocket upgrade handler.

use std::sync::Arc;

use axum::Extension;
use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;
use crate::domain::{RequestProfile, Session};

/// `GET /dashboard/ws` — Upgrade to a WebSocket streaming this profile's
/// selection changes.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Extension(profile): Extension<RequestProfile>,
) -> impl IntoResponse {
    let event_rx = state.event_bus.subscribe();
    let console_service = Arc::clone(&state.console_service);

    ws.on_upgrade(move |socket| {
        run_connection(socket, event_rx, console_service, session, profile)
    })
}
