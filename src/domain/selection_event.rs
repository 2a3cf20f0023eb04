//! Events emitted when a client profile's venue selection changes.
//!
//! Every successful [`crate::storage::VenueContextStore::set`] on a
//! registry-managed store produces one [`SelectionEvent`] on the
//! [`super::EventBus`]. WebSocket connections forward the events that
//! belong to their own profile.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ClientProfile, VenueId};

/// Domain event describing a selection change.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum SelectionEvent {
    /// The selected venue changed (or was cleared).
    SelectionChanged {
        /// Profile whose storage was written.
        profile: ClientProfile,
        /// New selection; `None` when cleared.
        venue_id: Option<VenueId>,
        /// Time of the write.
        timestamp: DateTime<Utc>,
    },
}

impl SelectionEvent {
    /// Returns the profile this event belongs to.
    #[must_use]
    pub const fn profile(&self) -> ClientProfile {
        match self {
            Self::SelectionChanged { profile, .. } => *profile,
        }
    }
}
