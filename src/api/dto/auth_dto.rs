//! Login, logout and password-reset DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::TenantId;

/// Body of `GET /login`.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginView {
    /// View discriminator.
    pub view: &'static str,
    /// Where the login form posts.
    pub submit_href: &'static str,
    /// Forgot-password link.
    pub forgot_password_href: &'static str,
}

/// Response body for `POST /login`.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Tenant of the operator, if onboarding is complete.
    pub tenant_id: Option<TenantId>,
    /// Session expiry.
    pub expires_at: DateTime<Utc>,
    /// First view to open.
    pub redirect_to: &'static str,
}

/// Request body for `POST /forgot-password`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ForgotPasswordRequest {
    /// Account email.
    pub email: String,
}

/// Query of `POST /reset-password?token=...`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ResetPasswordQuery {
    /// Reset token from the email link.
    pub token: String,
}

/// Request body for `POST /reset-password`.
#[derive(Deserialize, ToSchema)]
pub struct ResetPasswordRequest {
    /// New password.
    pub password: String,
}

impl std::fmt::Debug for ResetPasswordRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ResetPasswordRequest { password: *** }")
    }
}

/// Generic acknowledgement for fire-and-forget endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct AcceptedResponse {
    /// Always `"accepted"`.
    pub status: &'static str,
}

impl AcceptedResponse {
    /// The acknowledgement body.
    #[must_use]
    pub const fn accepted() -> Self {
        Self { status: "accepted" }
    }
}
