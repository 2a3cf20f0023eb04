//! Schedule view and AI generation for the selected venue.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};

use crate::api::dto::ScopedView;
use crate::app_state::AppState;
use crate::domain::{GenerationRequest, RequestProfile, Session};
use crate::error::{ConsoleError, ErrorResponse};

/// `GET /dashboard/schedule` — Current schedule of the selected venue.
///
/// # Errors
///
/// Returns [`ConsoleError`] on backend or storage failures.
#[utoipa::path(
    get,
    path = "/dashboard/schedule",
    tag = "Schedule",
    summary = "Get schedule",
    responses(
        (status = 200, description = "Schedule view", body = serde_json::Value),
        (status = 303, description = "No session, redirect to /login"),
        (status = 502, description = "Backend unavailable", body = ErrorResponse),
    )
)]
pub async fn get_schedule(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Extension(profile): Extension<RequestProfile>,
) -> Result<impl IntoResponse, ConsoleError> {
    let schedule = state.console_service.schedule(&session, profile).await?;
    Ok(Json(ScopedView::from(schedule)))
}

/// `POST /dashboard/schedule/generate` — Run the AI scheduler.
///
/// # Errors
///
/// Returns [`ConsoleError`] on backend or storage failures.
#[utoipa::path(
    post,
    path = "/dashboard/schedule/generate",
    tag = "Schedule",
    summary = "Generate schedule",
    description = "Asks the backend to generate the week starting at `week_start` for the selected venue.",
    request_body = GenerationRequest,
    responses(
        (status = 200, description = "Generated schedule view", body = serde_json::Value),
        (status = 502, description = "Backend unavailable", body = ErrorResponse),
    )
)]
pub async fn generate_schedule(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Extension(profile): Extension<RequestProfile>,
    Json(req): Json<GenerationRequest>,
) -> Result<impl IntoResponse, ConsoleError> {
    let schedule = state
        .console_service
        .generate_schedule(&session, profile, &req)
        .await?;
    Ok(Json(ScopedView::from(schedule)))
}

/// Schedule routes, relative to `/dashboard`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/schedule", get(get_schedule))
        .route("/schedule/generate", post(generate_schedule))
}
