use axum::{Json, extract::State};
use tracing::instrument;

use crate::modules::stats::model::StatsResponse;
use crate::modules::stats::service::StatsService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Cross-collection aggregates for the dashboard
#[utoipa::path(
    get,
    path = "/api/stats",
    summary = "Collection statistics",
    responses(
        (status = 200, description = "Aggregated counts, distributions and averages", body = StatsResponse),
        (status = 503, description = "Database unavailable")
    ),
    tag = "Stats"
)]
#[instrument(skip(state))]
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let stats = StatsService::collect(state.repo.as_ref(), &state.grade_scale).await?;
    Ok(Json(stats))
}
