use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_section, delete_section, get_section, list_sections, update_section,
};

/// Routes: GET /, POST /, GET /{id}, PUT /{id}, DELETE /{id}
pub fn init_sections_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sections).post(create_section))
        .route(
            "/{id}",
            get(get_section).put(update_section).delete(delete_section),
        )
}
