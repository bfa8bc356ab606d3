use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_department, delete_department, get_department, list_departments, update_department,
};

/// Routes: GET /, POST /, GET /{id}, PUT /{id}, DELETE /{id}
pub fn init_departments_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_departments).post(create_department))
        .route(
            "/{id}",
            get(get_department)
                .put(update_department)
                .delete(delete_department),
        )
}
