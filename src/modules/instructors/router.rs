use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_instructor, delete_instructor, get_instructor, list_instructors, update_instructor,
};

/// Routes: GET /, POST /, GET /{id}, PUT /{id}, DELETE /{id}
pub fn init_instructors_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_instructors).post(create_instructor))
        .route(
            "/{id}",
            get(get_instructor)
                .put(update_instructor)
                .delete(delete_instructor),
        )
}
