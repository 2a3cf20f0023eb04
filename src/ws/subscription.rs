//! Per-connection event filter.
//!
//! A connection only ever sees selection events of its own client profile.
//! Delivery can be paused and resumed by the client.

use crate::domain::{ClientProfile, SelectionEvent};

/// Decides which bus events reach one WebSocket connection.
#[derive(Debug)]
pub struct SubscriptionManager {
    profile: ClientProfile,
    active: bool,
}

impl SubscriptionManager {
    /// Creates an active filter for `profile`.
    #[must_use]
    pub const fn new(profile: ClientProfile) -> Self {
        Self {
            profile,
            active: true,
        }
    }

    /// Resumes delivery.
    pub fn subscribe(&mut self) {
        self.active = true;
    }

    /// Pauses delivery.
    pub fn unsubscribe(&mut self) {
        self.active = false;
    }

    /// Returns `true` if `event` should be forwarded.
    #[must_use]
    pub fn matches(&self, event: &SelectionEvent) -> bool {
        self.active && event.profile() == self.profile
    }

    /// Returns `true` while delivery is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }
}
