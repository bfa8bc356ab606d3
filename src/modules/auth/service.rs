use tracing::instrument;

use crate::config::jwt::JwtConfig;
use crate::modules::auth::model::{LoginDto, LoginResponse, UserInfo};
use crate::modules::auth::verifier::CredentialVerifier;
use crate::utils::errors::AppError;
use crate::utils::jwt::{ADMIN_ROLE, create_access_token};

pub struct AuthService;

impl AuthService {
    #[instrument(skip(verifier, jwt_config, dto))]
    pub fn login(
        verifier: &dyn CredentialVerifier,
        jwt_config: &JwtConfig,
        dto: LoginDto,
    ) -> Result<LoginResponse, AppError> {
        let username = dto.username.trim();
        if !verifier.verify(username, &dto.password) {
            return Err(AppError::unauthorized("invalid_credentials"));
        }

        let token = create_access_token(username, jwt_config)?;
        Ok(LoginResponse {
            ok: true,
            token,
            user: UserInfo {
                username: username.to_string(),
                role: ADMIN_ROLE.to_string(),
            },
        })
    }
}
