//! Client side of the external scheduling API.
//!
//! [`SchedulingBackend`] is the seam between the console and the service
//! that owns venues, staff, schedules and share tokens. Authenticated calls
//! take the operator's [`Credential`]; the share-link fetch takes only the
//! token, so a session credential can never leak into the share domain.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Credential, GenerationRequest, ShareToken, SharedSchedule, StaffMember, TenantId, Venue,
    VenueId, VenueSchedule,
};

pub use http::HttpBackend;

/// Result alias for backend calls.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors returned by [`SchedulingBackend`] implementations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The operator credential was refused.
    #[error("backend rejected the operator credential")]
    Unauthorized,

    /// Login failed for the given credentials.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The share token is unknown, revoked or expired.
    #[error("share token rejected")]
    TokenRejected,

    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-success response.
    #[error("backend returned {status}: {message}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },
}

/// Operator login credentials.
#[derive(Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginCredentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthGrant {
    /// Bearer credential for subsequent calls.
    pub access_token: Credential,
    /// Tenant of the operator, absent until onboarding completes.
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
}

/// Operations the console needs from the scheduling API.
#[async_trait]
pub trait SchedulingBackend: Send + Sync + std::fmt::Debug {
    /// Exchanges login credentials for an access credential.
    async fn authenticate(&self, credentials: &LoginCredentials) -> BackendResult<AuthGrant>;

    /// Asks the backend to email a password-reset link.
    async fn request_password_reset(&self, email: &str) -> BackendResult<()>;

    /// Sets a new password using a reset token from the email.
    async fn reset_password(&self, reset_token: &str, new_password: &str) -> BackendResult<()>;

    /// Venues owned by `tenant`, in backend order.
    async fn list_venues(&self, credential: &Credential, tenant: &TenantId)
    -> BackendResult<Vec<Venue>>;

    /// Staff employed at `venue`.
    async fn list_staff(&self, credential: &Credential, venue: &VenueId)
    -> BackendResult<Vec<StaffMember>>;

    /// Current schedule of `venue`.
    async fn venue_schedule(&self, credential: &Credential, venue: &VenueId)
    -> BackendResult<VenueSchedule>;

    /// Runs the AI scheduler for `venue`.
    async fn generate_schedule(
        &self,
        credential: &Credential,
        venue: &VenueId,
        request: &GenerationRequest,
    ) -> BackendResult<VenueSchedule>;

    /// Mints a share token bound to `venue` and `staff_id`.
    async fn create_share_token(
        &self,
        credential: &Credential,
        venue: &VenueId,
        staff_id: &str,
    ) -> BackendResult<ShareToken>;

    /// Unauthenticated fetch of the schedule a share token grants.
    async fn shared_schedule(&self, token: &ShareToken) -> BackendResult<SharedSchedule>;
}
