//! Share-link view DTO.

use axum::http::StatusCode;
use serde::Serialize;

use crate::domain::SharedSchedule;
use crate::service::{ShareFailure, ShareState};

/// Message shown for a valid link with nothing scheduled.
pub const NO_SHIFTS_MESSAGE: &str = "You have no upcoming shifts.";

/// Body of `GET /s/{token}/schedule`, tagged by `state`.
#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ShareView {
    /// The fetch has not settled.
    Loading,
    /// Upcoming shifts.
    Resolved {
        /// Schedule payload.
        schedule: SharedSchedule,
    },
    /// Valid link, no upcoming shifts.
    Empty {
        /// Schedule header (venue, staff).
        schedule: SharedSchedule,
        /// Friendly note.
        message: &'static str,
    },
    /// The link could not be resolved.
    Failed {
        /// Machine-readable reason.
        reason: &'static str,
        /// User-facing message.
        message: &'static str,
        /// Same-token retry target; absent when retrying cannot help.
        #[serde(skip_serializing_if = "Option::is_none")]
        retry_href: Option<String>,
    },
}

impl ShareView {
    /// Builds the view for a settled resolver state. `retry_href` is the
    /// path that re-issues the same fetch.
    #[must_use]
    pub fn from_state(state: ShareState, retry_href: Option<String>) -> Self {
        match state {
            ShareState::Idle | ShareState::Loading { .. } => Self::Loading,
            ShareState::Resolved(schedule) => Self::Resolved { schedule },
            ShareState::Empty(schedule) => Self::Empty {
                schedule,
                message: NO_SHIFTS_MESSAGE,
            },
            ShareState::Failed(failure) => Self::Failed {
                reason: failure.reason(),
                message: failure.message(),
                retry_href,
            },
        }
    }

    /// HTTP status to send with this view.
    #[must_use]
    pub const fn status_for(state: &ShareState) -> StatusCode {
        match state {
            ShareState::Idle | ShareState::Loading { .. } => StatusCode::ACCEPTED,
            ShareState::Resolved(_) | ShareState::Empty(_) => StatusCode::OK,
            ShareState::Failed(ShareFailure::InvalidOrExpiredToken) => StatusCode::NOT_FOUND,
            ShareState::Failed(ShareFailure::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}
