use axum::{extract::Extension, Json};

use crate::common::errors::ApiError;
use crate::domains::comparisons::actions::recent_comparisons;
use crate::domains::comparisons::models::RecentComparison;
use crate::server::app::AppState;

/// The 5 most recent comparisons, newest first, without result payloads.
pub async fn recent_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<RecentComparison>>, ApiError> {
    let rows = recent_comparisons(state.deps.store.as_ref()).await?;
    Ok(Json(rows))
}
