//! OpenAPI document for the console HTTP surface.

use utoipa::OpenApi;

use crate::api::dto::{
    AcceptedResponse, ForgotPasswordRequest, LoginResponse, LoginView, ResetPasswordRequest,
    SelectVenueRequest, SelectionResponse, ShareLinkResponse,
};
use crate::api::handlers::{auth, schedule, share, staff, system, venues};
use crate::backend::LoginCredentials;
use crate::domain::{
    GenerationRequest, SharedSchedule, Shift, StaffMember, TenantId, Venue, VenueId,
    VenueSchedule,
};
use crate::error::{ErrorBody, ErrorResponse};

/// Aggregated OpenAPI description, served at `/api-docs/openapi.json`.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "rota-console",
        description = "Session-gated staff-scheduling console with venue context and share links."
    ),
    paths(
        system::health_handler,
        auth::login_view,
        auth::login,
        auth::logout,
        auth::forgot_password,
        auth::reset_password,
        venues::list_venues,
        venues::select_venue,
        staff::list_staff,
        staff::create_share_link,
        schedule::get_schedule,
        schedule::generate_schedule,
        share::open_link,
        share::view_schedule,
    ),
    components(schemas(
        AcceptedResponse,
        ErrorBody,
        ErrorResponse,
        ForgotPasswordRequest,
        GenerationRequest,
        LoginCredentials,
        LoginResponse,
        LoginView,
        ResetPasswordRequest,
        SelectVenueRequest,
        SelectionResponse,
        ShareLinkResponse,
        SharedSchedule,
        Shift,
        StaffMember,
        TenantId,
        Venue,
        VenueId,
        VenueSchedule,
    )),
    tags(
        (name = "System", description = "Health"),
        (name = "Auth", description = "Operator login and password reset"),
        (name = "Venues", description = "Tenant venues and the active selection"),
        (name = "Staff", description = "Staff of the selected venue"),
        (name = "Schedule", description = "Schedules of the selected venue"),
        (name = "Share", description = "Anonymous token-scoped schedule links"),
    )
)]
pub struct ApiDoc;
