use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::modules::auth::model::OkResponse;
use crate::modules::auth::router::init_auth_router;
use crate::modules::courses::router::init_courses_router;
use crate::modules::departments::router::init_departments_router;
use crate::modules::enrollments::router::init_enrollments_router;
use crate::modules::instructors::router::init_instructors_router;
use crate::modules::reports::router::init_reports_router;
use crate::modules::sections::router::init_sections_router;
use crate::modules::stats::router::init_stats_router;
use crate::modules::students::router::init_students_router;
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{Json, Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

async fn health() -> Json<OkResponse> {
    Json(OkResponse { ok: true })
}

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .route("/health", get(health))
                .nest("/auth", init_auth_router())
                .nest("/departments", init_departments_router())
                .nest("/instructors", init_instructors_router())
                .nest("/students", init_students_router())
                .nest("/courses", init_courses_router())
                .nest("/sections", init_sections_router())
                .nest("/enrollments", init_enrollments_router())
                .nest("/stats", init_stats_router())
                .nest("/reports", init_reports_router()),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
