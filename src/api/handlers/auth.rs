//! Public auth handlers: login, logout and password reset.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    AcceptedResponse, ForgotPasswordRequest, LoginResponse, LoginView, ResetPasswordQuery,
    ResetPasswordRequest,
};
use crate::app_state::AppState;
use crate::auth::cookies::{self, CookieAttrs};
use crate::backend::LoginCredentials;
use crate::domain::SessionId;
use crate::error::{ConsoleError, ErrorResponse, LOGIN_ROUTE};

/// First dashboard view after login.
pub const DASHBOARD_HOME: &str = "/dashboard/venues";

/// `GET /login` — Login view descriptor.
#[utoipa::path(
    get,
    path = "/login",
    tag = "Auth",
    summary = "Login view",
    responses(
        (status = 200, description = "Login form descriptor", body = LoginView),
    )
)]
pub async fn login_view() -> impl IntoResponse {
    Json(LoginView {
        view: "login",
        submit_href: LOGIN_ROUTE,
        forgot_password_href: "/forgot-password",
    })
}

/// `POST /login` — Authenticate and open a session.
///
/// # Errors
///
/// Returns [`ConsoleError::InvalidCredentials`] when the backend refuses the
/// credentials.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    summary = "Log in",
    description = "Authenticates against the scheduling backend and sets the session cookie.",
    request_body = LoginCredentials,
    responses(
        (status = 200, description = "Session opened", body = LoginResponse),
        (status = 400, description = "Missing email or password", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<LoginCredentials>,
) -> Result<Response, ConsoleError> {
    let session = state.session_service.login(&credentials).await?;

    let mut response = Json(LoginResponse {
        tenant_id: session.tenant.clone(),
        expires_at: session.expires_at,
        redirect_to: DASHBOARD_HOME,
    })
    .into_response();
    cookies::append(
        response.headers_mut(),
        &state.cookies.session_name,
        &session.id.to_string(),
        CookieAttrs {
            max_age_secs: state.cookies.session_max_age_secs,
            secure: state.cookies.secure,
        },
    );
    Ok(response)
}

/// `POST /logout` — Destroy the session and return to the login view.
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Auth",
    summary = "Log out",
    responses(
        (status = 303, description = "Session cleared, redirect to /login"),
    )
)]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let id = cookies::read(&headers, &state.cookies.session_name)
        .and_then(|raw| SessionId::parse(&raw));
    state.session_service.logout(id);

    let mut response = Redirect::to(LOGIN_ROUTE).into_response();
    cookies::append(
        response.headers_mut(),
        &state.cookies.session_name,
        "",
        CookieAttrs {
            max_age_secs: 0,
            secure: state.cookies.secure,
        },
    );
    response
}

/// `POST /forgot-password` — Request a reset email.
///
/// Always answers `202` for a well-formed request so account existence is
/// not disclosed.
///
/// # Errors
///
/// Returns [`ConsoleError`] on a blank email or a backend outage.
#[utoipa::path(
    post,
    path = "/forgot-password",
    tag = "Auth",
    summary = "Request a password reset",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 202, description = "Request accepted", body = AcceptedResponse),
        (status = 400, description = "Missing email", body = ErrorResponse),
    )
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, ConsoleError> {
    if req.email.trim().is_empty() {
        return Err(ConsoleError::InvalidRequest("email is required".to_string()));
    }
    state.session_service.forgot_password(req.email.trim()).await?;
    Ok((StatusCode::ACCEPTED, Json(AcceptedResponse::accepted())))
}

/// `POST /reset-password?token=...` — Set a new password.
///
/// # Errors
///
/// Returns [`ConsoleError::InvalidOrExpiredToken`] for a rejected reset
/// token.
#[utoipa::path(
    post,
    path = "/reset-password",
    tag = "Auth",
    summary = "Complete a password reset",
    params(ResetPasswordQuery),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = AcceptedResponse),
        (status = 400, description = "Missing password", body = ErrorResponse),
        (status = 404, description = "Invalid or expired reset token", body = ErrorResponse),
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Query(query): Query<ResetPasswordQuery>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, ConsoleError> {
    state
        .session_service
        .reset_password(&query.token, &req.password)
        .await?;
    Ok(Json(AcceptedResponse::accepted()))
}

/// Public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(LOGIN_ROUTE, get(login_view).post(login))
        .route("/logout", post(logout))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}
