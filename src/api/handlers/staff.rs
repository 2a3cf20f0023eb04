//! Staff list and share-link minting for the selected venue.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};

use crate::api::dto::{ScopedView, ShareLinkResponse};
use crate::app_state::AppState;
use crate::domain::{RequestProfile, Session};
use crate::error::{ConsoleError, ErrorResponse};
use crate::service::Scoped;

/// `GET /dashboard/staff` — Staff of the selected venue.
///
/// # Errors
///
/// Returns [`ConsoleError`] on backend or storage failures.
#[utoipa::path(
    get,
    path = "/dashboard/staff",
    tag = "Staff",
    summary = "List staff",
    responses(
        (status = 200, description = "Staff view", body = serde_json::Value),
        (status = 303, description = "No session, redirect to /login"),
        (status = 502, description = "Backend unavailable", body = ErrorResponse),
    )
)]
pub async fn list_staff(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Extension(profile): Extension<RequestProfile>,
) -> Result<impl IntoResponse, ConsoleError> {
    let staff = state.console_service.staff(&session, profile).await?;
    Ok(Json(ScopedView::from(staff)))
}

/// `POST /dashboard/staff/{staff_id}/share-link` — Mint a schedule link.
///
/// # Errors
///
/// Returns [`ConsoleError::InvalidRequest`] for a blank staff id.
#[utoipa::path(
    post,
    path = "/dashboard/staff/{staff_id}/share-link",
    tag = "Staff",
    summary = "Create share link",
    description = "Mints a token bound to the selected venue and one staff member.",
    params(
        ("staff_id" = String, Path, description = "Staff member identifier"),
    ),
    responses(
        (status = 201, description = "Link minted", body = serde_json::Value),
        (status = 200, description = "No venue selected", body = serde_json::Value),
        (status = 400, description = "Invalid staff id", body = ErrorResponse),
    )
)]
pub async fn create_share_link(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Extension(profile): Extension<RequestProfile>,
    Path(staff_id): Path<String>,
) -> Result<impl IntoResponse, ConsoleError> {
    let scoped = state
        .console_service
        .create_share_link(&session, profile, &staff_id)
        .await?;

    let status = if matches!(scoped, Scoped::Ready { .. }) {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let scoped = match scoped {
        Scoped::Ready { venue, data } => {
            tracing::info!(
                venue_id = %venue.id,
                %staff_id,
                token = %data.token.redacted(),
                "share link minted"
            );
            Scoped::Ready {
                venue,
                data: ShareLinkResponse {
                    staff_id,
                    url: data.url,
                },
            }
        }
        Scoped::Pending => Scoped::Pending,
        Scoped::NoVenues => Scoped::NoVenues,
    };
    Ok((status, Json(ScopedView::from(scoped))))
}

/// Staff routes, relative to `/dashboard`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/staff", get(list_staff))
        .route("/staff/{staff_id}/share-link", post(create_share_link))
}
