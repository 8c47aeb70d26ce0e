use axum::{extract::Extension, Json};

use crate::common::errors::ApiError;
use crate::domains::comparisons::actions::trending_comparisons;
use crate::domains::comparisons::models::TrendingComparison;
use crate::server::app::AppState;

/// The top 5 comparison triples across the recent window, by count.
pub async fn trending_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<TrendingComparison>>, ApiError> {
    let groups = trending_comparisons(state.deps.store.as_ref()).await?;
    Ok(Json(groups))
}
