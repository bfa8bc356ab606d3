use axum::Json;
use axum::extract::State;
use axum::http::request::Parts;
use tracing::instrument;
use utoipa::ToSchema;

use crate::middleware::auth::claims_from_parts;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::ADMIN_ROLE;
use crate::validator::ValidatedJson;

use super::model::{LoginDto, LoginResponse, MeResponse, OkResponse};
use super::service::AuthService;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Login with the admin credentials and receive a bearer token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 400, description = "Bad request - validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginDto>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login(state.auth.as_ref(), &state.jwt_config, dto)?;
    Ok(Json(response))
}

/// Logout (stateless: clients discard the token)
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = OkResponse)
    ),
    tag = "Authentication"
)]
#[instrument]
pub async fn logout() -> Json<OkResponse> {
    Json(OkResponse { ok: true })
}

/// Report whether the caller holds a valid admin token
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current auth state", body = MeResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, parts))]
pub async fn me(State(state): State<AppState>, parts: Parts) -> Json<MeResponse> {
    let is_admin = claims_from_parts(&parts, &state)
        .map(|claims| claims.role == ADMIN_ROLE)
        .unwrap_or(false);
    Json(MeResponse { is_admin })
}
