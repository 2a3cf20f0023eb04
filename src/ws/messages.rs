//! WebSocket message types: envelope, commands, and events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; server-generated for events.
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    pub payload: serde_json::Value,
}

impl WsMessage {
    /// Server-originated message with a fresh id.
    #[must_use]
    pub fn server(msg_type: WsMessageType, payload: serde_json::Value) -> Self {
        Self::reply(uuid::Uuid::new_v4().to_string(), msg_type, payload)
    }

    /// Message answering the request `id`.
    #[must_use]
    pub fn reply(id: String, msg_type: WsMessageType, payload: serde_json::Value) -> Self {
        Self {
            id,
            msg_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Error message with a numeric code.
    #[must_use]
    pub fn error(id: String, code: u16, message: &str) -> Self {
        Self::reply(
            id,
            WsMessageType::Error,
            serde_json::json!({ "code": code, "message": message }),
        )
    }

    /// Serializes the envelope. Serialization of these payloads cannot fail
    /// in practice; an empty string is returned if it does.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client response to a command.
    Response,
    /// Server → Client selection event.
    Event,
    /// Server → Client error.
    Error,
}

/// Commands a dashboard client can send, read from the envelope payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Liveness check; answered with the reconciled selection.
    Ping,
    /// Reads the profile's selection, reconciled against the tenant's venues.
    GetSelection,
    /// Resumes selection-event delivery.
    Subscribe,
    /// Pauses selection-event delivery.
    Unsubscribe,
}
