//! In-process table of live operator sessions.
//!
//! Lookups are synchronous so the guard can decide before any handler runs.
//! Expired sessions are purged on lookup and are indistinguishable from
//! sessions that never existed.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{Duration, Utc};

use crate::domain::{Credential, Session, SessionId, TenantId};

/// Failures of the session-presence check itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The session cookie is present but not a session identifier.
    #[error("malformed session cookie")]
    MalformedCookie,

    /// The session table lock was poisoned by a panicking writer.
    #[error("session table unavailable")]
    Unavailable,
}

/// Live sessions keyed by cookie identifier.
#[derive(Debug)]
pub struct SessionTable {
    sessions: RwLock<HashMap<SessionId, Session>>,
    ttl: Duration,
}

impl SessionTable {
    /// Creates an empty table whose sessions live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Stores a new session and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Unavailable`] if the table is poisoned.
    pub fn create(
        &self,
        credential: Credential,
        tenant: Option<TenantId>,
    ) -> Result<Session, SessionError> {
        let now = Utc::now();
        let session = Session {
            id: SessionId::new(),
            credential,
            tenant,
            created_at: now,
            expires_at: now + self.ttl,
        };
        let mut sessions = self.sessions.write().map_err(|_| SessionError::Unavailable)?;
        sessions.insert(session.id, session.clone());
        Ok(session)
    }

    /// Returns the live session for `id`, purging it if expired.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Unavailable`] if the table is poisoned. The
    /// caller must treat that as "no session".
    pub fn lookup(&self, id: SessionId) -> Result<Option<Session>, SessionError> {
        let now = Utc::now();
        let found = {
            let sessions = self.sessions.read().map_err(|_| SessionError::Unavailable)?;
            sessions.get(&id).cloned()
        };
        match found {
            Some(session) if session.is_expired_at(now) => {
                self.destroy(id);
                tracing::info!(session = %id, "session expired");
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Removes a session. Returns `true` if it existed.
    pub fn destroy(&self, id: SessionId) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some()
    }

    /// Drops every expired session. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        before.saturating_sub(sessions.len())
    }

    /// Number of stored sessions, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no session is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
