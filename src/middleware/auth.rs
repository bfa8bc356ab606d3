use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::modules::auth::model::Claims;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{ADMIN_ROLE, verify_token};

/// Extractor gating every mutating route: a valid admin bearer token or a
/// uniform 403. The rejection deliberately does not distinguish a missing
/// header from a bad token.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = claims_from_parts(parts, state).ok_or_else(AppError::forbidden)?;
        if claims.role != ADMIN_ROLE {
            return Err(AppError::forbidden());
        }
        Ok(AdminUser(claims))
    }
}

/// Best-effort claim extraction for routes that only report auth state.
pub fn claims_from_parts(parts: &Parts, state: &AppState) -> Option<Claims> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())?;
    let token = auth_header.strip_prefix("Bearer ")?;
    verify_token(token, &state.jwt_config).ok()
}
