//! Admin login and session endpoints

use axum::{
    Json, Router,
    extract::State,
    http::header,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AdminAuth, AdminSession, AppError, IssuedToken, SessionClaims, ValidatedJson,
    errors::responses::{BadRequestValidationResponse, UnauthorizedResponse},
    require_admin,
};
use serde::Deserialize;
use utoipa::{OpenApi, ToSchema};
use validator::Validate;

use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 200))]
    pub username: String,
    #[validate(length(min = 1, max = 200))]
    pub password: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(login, me),
    components(
        schemas(LoginRequest, IssuedToken, SessionClaims),
        responses(UnauthorizedResponse, BadRequestValidationResponse)
    ),
    tags(
        (name = "Auth", description = "Admin session endpoints")
    )
)]
pub struct AuthApiDoc;

pub fn router(state: &AppState) -> Router {
    let auth = state.auth.clone();

    Router::new()
        .route("/login", post(login))
        .route(
            "/me",
            get(me).route_layer(middleware::from_fn_with_state(auth.clone(), require_admin)),
        )
        .with_state(auth)
}

/// Exchange the admin credential pair for a session token
///
/// The token is returned in the body and as an `access_token` cookie.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session issued", body = IssuedToken),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn login(
    State(auth): State<AdminAuth>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let issued = auth.login(&input.username, &input.password)?;
    tracing::info!(username = %input.username, "Admin logged in");

    let cookie = format!(
        "access_token={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        issued.access_token, issued.expires_in
    );
    Ok(([(header::SET_COOKIE, cookie)], Json(issued)))
}

/// Current admin session
#[utoipa::path(
    get,
    path = "/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Session claims", body = SessionClaims),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn me(AdminSession(claims): AdminSession) -> Json<SessionClaims> {
    Json(claims)
}
