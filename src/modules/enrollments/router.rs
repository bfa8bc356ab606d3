use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_enrollment, delete_enrollment, get_enrollment, list_enrollments, update_enrollment,
};

/// Routes: GET /, POST /, GET /{id}, PUT /{id}, DELETE /{id}
pub fn init_enrollments_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_enrollments).post(create_enrollment))
        .route(
            "/{id}",
            get(get_enrollment)
                .put(update_enrollment)
                .delete(delete_enrollment),
        )
}
