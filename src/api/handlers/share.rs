//! Token-scoped share-link routes. No operator session is consulted here.

use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequestParts, Path, State};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::ShareView;
use crate::app_state::AppState;
use crate::domain::{ShareToken, ShareTokenError};
use crate::service::{ShareFailure, ShareState};

/// `{token}` path segment, parsed into a [`ShareToken`] once at the route
/// boundary. A malformed segment is kept as the parse error so the handler
/// can answer with the expired-link view instead of a bare rejection.
#[derive(Debug)]
pub struct TokenParam(pub Result<ShareToken, ShareTokenError>);

impl<S: Send + Sync> FromRequestParts<S> for TokenParam {
    type Rejection = PathRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state).await?;
        Ok(Self(ShareToken::parse(&raw)))
    }
}

/// Expired-link view for a segment that can never be a token.
fn malformed(error: &ShareTokenError) -> Response {
    tracing::debug!(%error, "malformed share token");
    let state = ShareState::Failed(ShareFailure::InvalidOrExpiredToken);
    let status = ShareView::status_for(&state);
    (status, Json(ShareView::from_state(state, None))).into_response()
}

/// `GET /s/{token}` — Forward to the token's schedule view.
///
/// Does not fetch anything; the token is carried over unchanged.
#[utoipa::path(
    get,
    path = "/s/{token}",
    tag = "Share",
    summary = "Open share link",
    params(
        ("token" = String, Path, description = "Share token"),
    ),
    responses(
        (status = 303, description = "Redirect to /s/{token}/schedule"),
        (status = 404, description = "Malformed token", body = serde_json::Value),
    )
)]
pub async fn open_link(TokenParam(token): TokenParam) -> Response {
    match token {
        Ok(token) => Redirect::to(&token.schedule_path()).into_response(),
        Err(e) => malformed(&e),
    }
}

/// `GET /s/{token}/schedule` — Resolve a share token to its schedule.
///
/// Retrying is a repeat of this request with the same token.
#[utoipa::path(
    get,
    path = "/s/{token}/schedule",
    tag = "Share",
    summary = "View shared schedule",
    description = "Resolves the token against the backend without any operator credential. `state` is `resolved`, `empty` or `failed`.",
    params(
        ("token" = String, Path, description = "Share token"),
    ),
    responses(
        (status = 200, description = "Shifts or empty notice", body = serde_json::Value),
        (status = 404, description = "Invalid or expired link", body = serde_json::Value),
        (status = 503, description = "Backend unavailable, retry", body = serde_json::Value),
    )
)]
pub async fn view_schedule(
    State(state): State<AppState>,
    TokenParam(token): TokenParam,
) -> Response {
    let token = match token {
        Ok(token) => token,
        Err(e) => return malformed(&e),
    };
    let retry_href = token.schedule_path();
    let outcome = state.share_service.resolve(token).await;
    let status = ShareView::status_for(&outcome);
    (status, Json(ShareView::from_state(outcome, Some(retry_href)))).into_response()
}

/// Share routes mounted at the root, outside the session gate.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/s/{token}", get(open_link))
        .route("/s/{token}/schedule", get(view_schedule))
}
