//! Session and account handlers: sign-in, sign-out, registration, and the
//! privileged dashboard.

use actix_web::{delete, get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Credentials, Error, Identity, Report, ReportStatus, SignUpError, SignUpForm,
};
use crate::inbound::http::error::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::AppState;

/// Credentials for the sign-in form.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Account-creation payload.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Confirmation returned after a successful registration.
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountCreated {
    pub message: String,
}

/// Privileged overview of the live reports.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub identity: Identity,
    pub total_projects: usize,
    pub total_reports: usize,
    pub pending_reports: usize,
    pub confirmed_reports: usize,
    pub resolved_reports: usize,
    pub reports: Vec<Report>,
}

const ACCOUNT_CREATED_MESSAGE: &str = "Account created successfully! You can now log in.";

/// Sign in as a municipal official.
///
/// Valid credentials whose email is not on the authorization allow-list are
/// refused with `403` and the backend session is revoked.
#[utoipa::path(
    post,
    path = "/api/v1/session",
    tags = ["session"],
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = Identity),
        (status = 400, description = "Malformed credentials"),
        (status = 401, description = "Unknown account or wrong password"),
        (status = 403, description = "Email is not an authorized official"),
    ),
    operation_id = "signIn"
)]
#[post("/session")]
pub async fn sign_in(
    state: web::Data<AppState>,
    session: SessionContext,
    payload: web::Json<SignInRequest>,
) -> ApiResult<web::Json<Identity>> {
    let credentials = Credentials::try_from_parts(&payload.email, &payload.password)
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    let identity = state.gate.sign_in(&credentials).await?;
    session.persist_email(&identity.email)?;
    Ok(web::Json(identity))
}

/// Sign out and drop the session cookie.
#[utoipa::path(
    delete,
    path = "/api/v1/session",
    tags = ["session"],
    responses(
        (status = 204, description = "Signed out"),
    ),
    operation_id = "signOut"
)]
#[delete("/session")]
pub async fn sign_out(
    state: web::Data<AppState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    state.gate.sign_out().await?;
    session.clear();
    Ok(HttpResponse::NoContent().finish())
}

/// Register a new account. Success does not sign the caller in.
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    tags = ["session"],
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created", body = AccountCreated),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email is already registered"),
    ),
    operation_id = "signUp"
)]
#[post("/accounts")]
pub async fn sign_up(
    state: web::Data<AppState>,
    payload: web::Json<SignUpRequest>,
) -> ApiResult<HttpResponse> {
    let form = SignUpForm::new(
        payload.email.clone(),
        payload.password.clone(),
        payload.confirm_password.clone(),
    );
    state.gate.sign_up(&form).await.map_err(|err| match err {
        SignUpError::Invalid(err) => Error::invalid_request(err.to_string()),
        SignUpError::Backend(err) => Error::from(err),
    })?;
    Ok(HttpResponse::Created().json(AccountCreated {
        message: ACCOUNT_CREATED_MESSAGE.to_owned(),
    }))
}

/// Privileged dashboard summary.
///
/// The session email is re-checked against the authorization policy on every
/// request; a session that no longer passes is refused.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tags = ["session"],
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardView),
        (status = 401, description = "No session"),
        (status = 403, description = "Session email is no longer authorized"),
    ),
    operation_id = "dashboard"
)]
#[get("/dashboard")]
pub async fn dashboard(
    state: web::Data<AppState>,
    session: SessionContext,
) -> ApiResult<web::Json<DashboardView>> {
    let email = session.require_email()?;
    if !state.gate.is_authorized(&email) {
        return Err(Error::forbidden(
            "Access restricted to authorized officials only",
        ));
    }

    let projects = state.reporting.projects().await;
    let reports = state.reporting.reports().await;
    let count = |status: ReportStatus| reports.iter().filter(|r| r.status == status).count();
    Ok(web::Json(DashboardView {
        identity: Identity {
            email,
            is_privileged: true,
        },
        total_projects: projects.len(),
        total_reports: reports.len(),
        pending_reports: count(ReportStatus::Reported),
        confirmed_reports: count(ReportStatus::Confirmed),
        resolved_reports: count(ReportStatus::Resolved),
        reports,
    }))
}
