//! Route handlers organized by resource.
//!
//! [`dashboard_routes`] must be mounted behind the session gate;
//! [`public_routes`] must not.

pub mod auth;
pub mod schedule;
pub mod share;
pub mod staff;
pub mod system;
pub mod venues;

use axum::Router;

use crate::app_state::AppState;

/// Venue-scoped operator routes, relative to `/dashboard`.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .merge(venues::routes())
        .merge(staff::routes())
        .merge(schedule::routes())
}

/// Routes reachable without an operator session.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .merge(system::routes())
        .merge(auth::routes())
        .merge(share::routes())
}
