//! Console error types with HTTP status code mapping.
//!
//! [`ConsoleError`] is the central error type for the console. Each variant
//! maps to a specific HTTP status code and structured JSON error response,
//! except [`ConsoleError::Unauthenticated`], which always becomes a redirect
//! to the login route.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::backend::BackendError;
use crate::storage::StorageError;

/// Route every unauthenticated dashboard request is sent to.
pub const LOGIN_ROUTE: &str = "/login";

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2002,
///     "message": "venue v9 is not one of your venues",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category           | HTTP Status              |
/// |-----------|--------------------|--------------------------|
/// | 1000–1999 | Validation         | 400 Bad Request          |
/// | 2000–2999 | Auth / Not Found   | 303 to login / 401 / 404 |
/// | 3000–3999 | Server             | 500 Internal Server Error|
/// | 5000–5999 | Scheduling backend | 502 Bad Gateway          |
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// No live operator session. Never rendered; becomes a redirect.
    #[error("authentication required")]
    Unauthenticated,

    /// Login credentials were refused.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Share token unknown, revoked or expired.
    #[error("this link is invalid or has expired")]
    InvalidOrExpiredToken,

    /// Operator asked for a venue outside their tenant.
    #[error("venue {0} is not one of your venues")]
    UnknownVenue(String),

    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Durable storage failure.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The scheduling API failed.
    #[error("scheduling service error: {0}")]
    Backend(BackendError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<BackendError> for ConsoleError {
    fn from(err: BackendError) -> Self {
        match err {
            // An operator credential the backend no longer accepts is the
            // same as no session.
            BackendError::Unauthorized => Self::Unauthenticated,
            BackendError::InvalidCredentials => Self::InvalidCredentials,
            BackendError::TokenRejected => Self::InvalidOrExpiredToken,
            BackendError::NotFound(what) => Self::NotFound(what),
            other => Self::Backend(other),
        }
    }
}

impl ConsoleError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::Unauthenticated => 2000,
            Self::InvalidCredentials => 2001,
            Self::UnknownVenue(_) => 2002,
            Self::InvalidOrExpiredToken => 2003,
            Self::NotFound(_) => 2004,
            Self::Internal(_) => 3000,
            Self::Storage(_) => 3001,
            Self::Backend(_) => 5001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::SEE_OTHER,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::UnknownVenue(_) | Self::InvalidOrExpiredToken | Self::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Backend(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ConsoleError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Unauthenticated) {
            return Redirect::to(LOGIN_ROUTE).into_response();
        }
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(error = %self, code = self.error_code(), "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;

    #[test]
    fn unauthenticated_becomes_login_redirect() {
        let response = ConsoleError::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
            Some(LOGIN_ROUTE)
        );
    }

    #[test]
    fn backend_auth_failures_map_to_domains() {
        assert!(matches!(
            ConsoleError::from(BackendError::Unauthorized),
            ConsoleError::Unauthenticated
        ));
        assert!(matches!(
            ConsoleError::from(BackendError::TokenRejected),
            ConsoleError::InvalidOrExpiredToken
        ));
    }

    #[test]
    fn upstream_failure_is_bad_gateway() {
        let err = ConsoleError::from(BackendError::Upstream {
            status: 503,
            message: "down".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.error_code(), 5001);
    }
}
