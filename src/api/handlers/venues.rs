//! Venue list and venue switching.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Extension, Json, Router};

use crate::api::dto::{ScopedView, SelectVenueRequest, SelectionResponse};
use crate::app_state::AppState;
use crate::domain::{RequestProfile, Session, Venue};
use crate::error::{ConsoleError, ErrorResponse};

/// `GET /dashboard/venues` — Tenant venues plus the active selection.
///
/// Loading this view reconciles the stored selection against the fresh list.
///
/// # Errors
///
/// Returns [`ConsoleError`] if the backend or the selection store fails.
#[utoipa::path(
    get,
    path = "/dashboard/venues",
    tag = "Venues",
    summary = "List venues",
    description = "Returns the tenant's venues with the selected venue. `state` is `pending`, `empty` or `ready`.",
    responses(
        (status = 200, description = "Venue view", body = serde_json::Value),
        (status = 303, description = "No session, redirect to /login"),
        (status = 502, description = "Backend unavailable", body = ErrorResponse),
    )
)]
pub async fn list_venues(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Extension(profile): Extension<RequestProfile>,
) -> Result<impl IntoResponse, ConsoleError> {
    let scope = state.console_service.resolve_scope(&session, profile).await?;
    let view: ScopedView<Vec<Venue>> = scope.into();
    Ok(Json(view))
}

/// `PUT /dashboard/venues/selection` — Switch the active venue.
///
/// # Errors
///
/// Returns [`ConsoleError::UnknownVenue`] when the venue is not in the
/// tenant's list.
#[utoipa::path(
    put,
    path = "/dashboard/venues/selection",
    tag = "Venues",
    summary = "Select venue",
    request_body = SelectVenueRequest,
    responses(
        (status = 200, description = "Selection stored", body = SelectionResponse),
        (status = 400, description = "Account not set up", body = ErrorResponse),
        (status = 404, description = "Venue not in tenant list", body = ErrorResponse),
    )
)]
pub async fn select_venue(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Extension(profile): Extension<RequestProfile>,
    Json(req): Json<SelectVenueRequest>,
) -> Result<impl IntoResponse, ConsoleError> {
    let venue = state
        .console_service
        .select_venue(&session, profile, req.venue_id)
        .await?;
    Ok(Json(SelectionResponse {
        selected_venue_id: venue.id.clone(),
        venue,
    }))
}

/// Venue routes, relative to `/dashboard`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/venues", get(list_venues))
        .route("/venues/selection", put(select_venue))
}
