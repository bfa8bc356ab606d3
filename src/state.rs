use std::sync::Arc;

use crate::config::cors::CorsConfig;
use crate::config::database::init_db_pool;
use crate::config::jwt::JwtConfig;
use crate::grading::GradeScale;
use crate::modules::auth::verifier::{CredentialVerifier, EnvCredentials};
use crate::repo::Repository;
use crate::repo::postgres::PgRepository;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    pub auth: Arc<dyn CredentialVerifier>,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub grade_scale: GradeScale,
}

pub fn init_app_state() -> AppState {
    AppState {
        repo: Arc::new(PgRepository::new(init_db_pool())),
        auth: Arc::new(EnvCredentials::from_env()),
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        grade_scale: GradeScale::from_env(),
    }
}
