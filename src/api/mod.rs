//! HTTP layer: route handlers, DTOs, OpenAPI and router composition.
//!
//! Everything under `/dashboard` passes through [`require_session`] before
//! [`attach_profile`] or any handler runs. Auth, health and `/s/{token}`
//! share routes are mounted outside the gate.

pub mod dto;
pub mod handlers;
pub mod openapi;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::get;

use crate::app_state::AppState;
use crate::auth::{attach_profile, require_session};
use crate::ws::handler::ws_handler;

/// Builds the complete router. `state` is needed up front by the gate
/// middleware.
pub fn build_router(state: &AppState) -> Router<AppState> {
    let dashboard = handlers::dashboard_routes()
        .route("/ws", get(ws_handler))
        .layer(from_fn_with_state(state.clone(), attach_profile))
        .layer(from_fn_with_state(state.clone(), require_session));

    let router = Router::new()
        .nest("/dashboard", dashboard)
        .merge(handlers::public_routes());

    with_swagger(router)
}

#[cfg(feature = "swagger-ui")]
fn with_swagger(router: Router<AppState>) -> Router<AppState> {
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    router.merge(
        SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
    )
}

#[cfg(not(feature = "swagger-ui"))]
fn with_swagger(router: Router<AppState>) -> Router<AppState> {
    router
}
