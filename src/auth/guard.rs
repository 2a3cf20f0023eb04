//! Session gate for the `/dashboard` route tree.
//!
//! [`SessionGuard`] is a two-outcome state machine
//! (`Unverified → Authorized | Unauthorized`). [`require_session`] runs it as
//! axum middleware in front of every dashboard route: on `Unauthorized` it
//! answers with a redirect to the login route and the inner handler never
//! runs, so no tenant- or venue-scoped backend request can be issued.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use super::cookies::{self, CookieAttrs};
use super::session_table::{SessionError, SessionTable};
use crate::app_state::AppState;
use crate::domain::{ClientProfile, RequestProfile, Session, SessionId};
use crate::error::LOGIN_ROUTE;

/// Seconds a client-profile cookie lives: five years.
pub const PROFILE_COOKIE_MAX_AGE_SECS: i64 = 5 * 365 * 24 * 60 * 60;

/// Session-presence check used by the guard.
pub trait SessionProbe {
    /// Returns the current live session, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if presence cannot be determined.
    fn current(&self) -> Result<Option<Session>, SessionError>;

    /// Returns `true` if a live session exists.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if presence cannot be determined.
    fn session_present(&self) -> Result<bool, SessionError> {
        self.current().map(|session| session.is_some())
    }
}

/// Probe backed by the session cookie of one request.
#[derive(Debug)]
pub struct CookieSessionProbe<'a> {
    table: &'a SessionTable,
    cookie: Option<&'a str>,
}

impl<'a> CookieSessionProbe<'a> {
    /// Creates a probe for the given raw cookie value.
    #[must_use]
    pub const fn new(table: &'a SessionTable, cookie: Option<&'a str>) -> Self {
        Self { table, cookie }
    }
}

impl SessionProbe for CookieSessionProbe<'_> {
    fn current(&self) -> Result<Option<Session>, SessionError> {
        let Some(raw) = self.cookie else {
            return Ok(None);
        };
        let id = SessionId::parse(raw).ok_or(SessionError::MalformedCookie)?;
        self.table.lookup(id)
    }
}

/// Guard state.
#[derive(Debug, Clone)]
pub enum GuardState {
    /// Not checked yet.
    Unverified,
    /// A live session exists.
    Authorized(Session),
    /// No session, or the check failed.
    Unauthorized,
}

/// One-shot session gate for a single route entry.
#[derive(Debug)]
pub struct SessionGuard {
    state: GuardState,
}

impl Default for SessionGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionGuard {
    /// Creates an unverified guard.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: GuardState::Unverified,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &GuardState {
        &self.state
    }

    /// Queries `probe` once and settles the guard. Later calls return the
    /// settled state without probing again.
    ///
    /// A failing probe settles to [`GuardState::Unauthorized`].
    pub fn verify(&mut self, probe: &dyn SessionProbe) -> &GuardState {
        if matches!(self.state, GuardState::Unverified) {
            self.state = match probe.current() {
                Ok(Some(session)) => GuardState::Authorized(session),
                Ok(None) => GuardState::Unauthorized,
                Err(e) => {
                    tracing::warn!(error = %e, "session check failed; denying access");
                    GuardState::Unauthorized
                }
            };
        }
        &self.state
    }

    /// Consumes the guard, returning the session if authorized.
    #[must_use]
    pub fn into_session(self) -> Option<Session> {
        match self.state {
            GuardState::Authorized(session) => Some(session),
            GuardState::Unverified | GuardState::Unauthorized => None,
        }
    }
}

/// Middleware: admits the request only with a live session, attaching the
/// [`Session`] as a request extension. Otherwise redirects to `/login`.
pub async fn require_session(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let cookie = cookies::read(req.headers(), &state.cookies.session_name);
    let mut guard = SessionGuard::new();
    guard.verify(&CookieSessionProbe::new(
        state.session_service.table(),
        cookie.as_deref(),
    ));

    match guard.into_session() {
        Some(session) => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        None => {
            tracing::debug!(path = req.uri().path(), "no session; redirecting to login");
            Redirect::to(LOGIN_ROUTE).into_response()
        }
    }
}

/// Middleware: resolves the caller's [`ClientProfile`] from its cookie,
/// minting and setting a new one when missing or unreadable. The request
/// carries it as a [`RequestProfile`] extension.
pub async fn attach_profile(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let existing = cookies::read(req.headers(), &state.cookies.profile_name)
        .and_then(|raw| ClientProfile::parse(&raw));
    let profile = existing.map_or_else(
        || RequestProfile::minted(ClientProfile::new()),
        RequestProfile::returning,
    );
    req.extensions_mut().insert(profile);

    let mut response = next.run(req).await;
    if profile.minted {
        cookies::append(
            response.headers_mut(),
            &state.cookies.profile_name,
            &profile.id.to_string(),
            CookieAttrs {
                max_age_secs: PROFILE_COOKIE_MAX_AGE_SECS,
                secure: state.cookies.secure,
            },
        );
        tracing::debug!(%profile, "client profile minted");
    }
    response
}
