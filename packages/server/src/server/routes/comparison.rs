use axum::extract::{Extension, Path};
use axum::Json;

use crate::common::errors::ApiError;
use crate::domains::comparisons::actions::shared_comparison;
use crate::domains::comparisons::models::ComparisonRecord;
use crate::server::app::AppState;

/// Permalink lookup: the full persisted record for one comparison,
/// read-only.
pub async fn shared_comparison_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ComparisonRecord>, ApiError> {
    let record = shared_comparison(state.deps.store.as_ref(), &id).await?;
    Ok(Json(record))
}
