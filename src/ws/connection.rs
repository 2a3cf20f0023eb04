//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! answering client commands and forwarding the profile's selection events.
//! Selection queries are answered with the selection reconciled against the
//! tenant's current venues, never with the raw stored id.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::domain::{RequestProfile, SelectionEvent, Session};
use crate::error::ConsoleError;
use crate::service::ConsoleService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and answers them.
/// - Forwards matching events from the [`broadcast::Receiver`] to the client.
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<SelectionEvent>,
    console_service: Arc<ConsoleService>,
    session: Session,
    profile: RequestProfile,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new(profile.id);
    tracing::debug!(%profile, "ws connection opened");

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response =
                            handle_text_message(&text, &mut subs, &console_service, &session, profile)
                                .await;
                        if ws_tx.send(Message::text(response)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            event = event_rx.recv() => {
                match event {
                    Ok(selection_event) => {
                        if subs.matches(&selection_event) {
                            let msg = WsMessage::server(
                                WsMessageType::Event,
                                serde_json::to_value(&selection_event).unwrap_or_default(),
                            );
                            if ws_tx.send(Message::text(msg.to_json())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!(%profile, "ws connection closed");
}

/// Answers one text frame from the client.
async fn handle_text_message(
    text: &str,
    subs: &mut SubscriptionManager,
    console_service: &ConsoleService,
    session: &Session,
    profile: RequestProfile,
) -> String {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return WsMessage::error(String::new(), 400, "malformed JSON").to_json();
    };
    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload) else {
        return WsMessage::error(msg.id, 404, "unknown command").to_json();
    };

    let payload = match command {
        WsCommand::Ping | WsCommand::GetSelection => {
            match console_service.current_selection(session, profile).await {
                Ok(selected) => serde_json::json!({
                    "pong": command == WsCommand::Ping,
                    "selected_venue_id": selected,
                }),
                Err(e) => {
                    tracing::warn!(%profile, error = %e, "selection unavailable for ws client");
                    let code = match e {
                        ConsoleError::Unauthenticated => 401,
                        other => other.status_code().as_u16(),
                    };
                    return WsMessage::error(msg.id, code, "selection unavailable").to_json();
                }
            }
        }
        WsCommand::Subscribe => {
            subs.subscribe();
            serde_json::json!({ "subscribed": subs.is_active() })
        }
        WsCommand::Unsubscribe => {
            subs.unsubscribe();
            serde_json::json!({ "subscribed": subs.is_active() })
        }
    };
    WsMessage::reply(msg.id, WsMessageType::Response, payload).to_json()
}
