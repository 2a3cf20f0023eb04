//! Share-link resolution, outside the operator session domain.
//!
//! [`ShareTokenResolver`] turns a [`ShareToken`] into one of a small set of
//! terminal view states. It never reads or forwards operator credentials,
//! never retries on its own, and ignores completions that do not belong to
//! the attempt currently in flight.

use std::sync::Arc;

use crate::backend::{BackendError, SchedulingBackend};
use crate::domain::{ShareToken, SharedSchedule};

/// Message shown when the backend rejects a token.
pub const EXPIRED_LINK_MESSAGE: &str =
    "This link is invalid or has expired. Contact your manager for a new link.";

/// Message shown for any other failure.
pub const UNAVAILABLE_MESSAGE: &str =
    "The schedule could not be loaded right now. Please try again.";

/// Why a share link could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareFailure {
    /// The backend does not (or no longer does) honour the token.
    InvalidOrExpiredToken,
    /// Transport or server failure; retrying may help.
    Unavailable(String),
}

impl ShareFailure {
    /// User-facing message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::InvalidOrExpiredToken => EXPIRED_LINK_MESSAGE,
            Self::Unavailable(_) => UNAVAILABLE_MESSAGE,
        }
    }

    /// Stable machine-readable reason.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidOrExpiredToken => "invalid_or_expired_token",
            Self::Unavailable(_) => "unavailable",
        }
    }
}

impl From<BackendError> for ShareFailure {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::TokenRejected
            | BackendError::Unauthorized
            | BackendError::NotFound(_) => Self::InvalidOrExpiredToken,
            other => Self::Unavailable(other.to_string()),
        }
    }
}

/// Resolver state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareState {
    /// Nothing requested yet.
    Idle,
    /// Fetch `attempt` is in flight.
    Loading {
        /// Attempt number, starting at 1.
        attempt: u64,
    },
    /// Schedule with at least one upcoming shift.
    Resolved(SharedSchedule),
    /// Valid link, no upcoming shifts.
    Empty(SharedSchedule),
    /// The fetch failed.
    Failed(ShareFailure),
}

/// Resolves one share token.
#[derive(Debug)]
pub struct ShareTokenResolver {
    token: ShareToken,
    state: ShareState,
    attempts: u64,
}

impl ShareTokenResolver {
    /// Creates an idle resolver for `token`.
    #[must_use]
    pub const fn new(token: ShareToken) -> Self {
        Self {
            token,
            state: ShareState::Idle,
            attempts: 0,
        }
    }

    /// Token being resolved.
    #[must_use]
    pub const fn token(&self) -> &ShareToken {
        &self.token
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &ShareState {
        &self.state
    }

    /// Consumes the resolver, returning its state.
    #[must_use]
    pub fn into_state(self) -> ShareState {
        self.state
    }

    /// Starts the first fetch. Returns the attempt number, or `None` if the
    /// resolver already started.
    pub fn begin(&mut self) -> Option<u64> {
        if self.state != ShareState::Idle {
            return None;
        }
        Some(self.start_attempt())
    }

    /// Starts a manual retry. Only allowed from [`ShareState::Failed`].
    pub fn begin_retry(&mut self) -> Option<u64> {
        if !matches!(self.state, ShareState::Failed(_)) {
            return None;
        }
        Some(self.start_attempt())
    }

    fn start_attempt(&mut self) -> u64 {
        self.attempts = self.attempts.saturating_add(1);
        self.state = ShareState::Loading {
            attempt: self.attempts,
        };
        self.attempts
    }

    /// Applies the outcome of fetch `attempt`. Returns `false` (and changes
    /// nothing) unless that attempt is the one currently loading.
    pub fn complete(
        &mut self,
        attempt: u64,
        result: Result<SharedSchedule, BackendError>,
    ) -> bool {
        if self.state != (ShareState::Loading { attempt }) {
            tracing::debug!(attempt, "ignoring superseded share fetch");
            return false;
        }
        self.state = match result {
            Ok(schedule) if schedule.is_empty() => ShareState::Empty(schedule),
            Ok(schedule) => ShareState::Resolved(schedule),
            Err(e) => {
                let failure = ShareFailure::from(e);
                tracing::debug!(
                    token = %self.token.redacted(),
                    reason = failure.reason(),
                    "share link failed"
                );
                ShareState::Failed(failure)
            }
        };
        true
    }

    /// Issues the first fetch and settles.
    pub async fn resolve(&mut self, backend: &dyn SchedulingBackend) -> &ShareState {
        if let Some(attempt) = self.begin() {
            let result = backend.shared_schedule(&self.token).await;
            self.complete(attempt, result);
        }
        &self.state
    }

    /// Re-issues the same fetch after a failure. No-op in any other state.
    pub async fn retry(&mut self, backend: &dyn SchedulingBackend) -> &ShareState {
        if let Some(attempt) = self.begin_retry() {
            let result = backend.shared_schedule(&self.token).await;
            self.complete(attempt, result);
        }
        &self.state
    }
}

/// Entry point for the share routes.
#[derive(Debug, Clone)]
pub struct ShareService {
    backend: Arc<dyn SchedulingBackend>,
}

impl ShareService {
    /// Creates a new `ShareService`.
    #[must_use]
    pub fn new(backend: Arc<dyn SchedulingBackend>) -> Self {
        Self { backend }
    }

    /// Resolves `token` with a single fetch.
    pub async fn resolve(&self, token: ShareToken) -> ShareState {
        let mut resolver = ShareTokenResolver::new(token);
        resolver.resolve(self.backend.as_ref()).await;
        resolver.into_state()
    }
}
