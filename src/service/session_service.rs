//! Session service: login, logout and password-reset passthrough.

use std::sync::Arc;

use crate::auth::SessionTable;
use crate::backend::{BackendError, LoginCredentials, SchedulingBackend};
use crate::domain::{Session, SessionId};
use crate::error::ConsoleError;

/// Creates and destroys operator sessions.
#[derive(Debug)]
pub struct SessionService {
    backend: Arc<dyn SchedulingBackend>,
    table: SessionTable,
}

impl SessionService {
    /// Creates a new `SessionService` over an empty session table.
    #[must_use]
    pub fn new(backend: Arc<dyn SchedulingBackend>, table: SessionTable) -> Self {
        Self { backend, table }
    }

    /// Session table consulted by the dashboard guard.
    #[must_use]
    pub const fn table(&self) -> &SessionTable {
        &self.table
    }

    /// Authenticates against the backend and opens a session.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::InvalidCredentials`] when the backend refuses
    /// the login, [`ConsoleError::InvalidRequest`] for blank fields, and
    /// [`ConsoleError::Backend`] on transport failures.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Session, ConsoleError> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(ConsoleError::InvalidRequest(
                "email and password are required".to_string(),
            ));
        }

        let grant = self.backend.authenticate(credentials).await?;
        let session = self
            .table
            .create(grant.access_token, grant.tenant_id)
            .map_err(|e| ConsoleError::Internal(e.to_string()))?;

        tracing::info!(
            session = %session.id,
            tenant = ?session.tenant,
            "session created"
        );
        Ok(session)
    }

    /// Destroys the session, if any. Returns `true` if one was removed.
    pub fn logout(&self, id: Option<SessionId>) -> bool {
        let removed = id.is_some_and(|id| self.table.destroy(id));
        if removed {
            tracing::info!("session destroyed");
        }
        removed
    }

    /// Requests a reset email. Unknown addresses are not reported.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Backend`] when the backend is unreachable.
    pub async fn forgot_password(&self, email: &str) -> Result<(), ConsoleError> {
        match self.backend.request_password_reset(email.trim()).await {
            Ok(()) | Err(BackendError::NotFound(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Completes a password reset.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::InvalidRequest`] for a blank password or
    /// token, [`ConsoleError::InvalidOrExpiredToken`] when the backend rejects
    /// the reset token, and [`ConsoleError::Backend`] otherwise.
    pub async fn reset_password(&self, reset_token: &str, password: &str) -> Result<(), ConsoleError> {
        if reset_token.is_empty() || password.is_empty() {
            return Err(ConsoleError::InvalidRequest(
                "reset token and password are required".to_string(),
            ));
        }
        self.backend
            .reset_password(reset_token, password)
            .await
            .map_err(|e| match e {
                BackendError::Unauthorized | BackendError::NotFound(_) => {
                    ConsoleError::InvalidOrExpiredToken
                }
                other => other.into(),
            })
    }
}
