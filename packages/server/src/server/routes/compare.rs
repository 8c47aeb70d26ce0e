use axum::{extract::Extension, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::common::errors::ApiError;
use crate::domains::comparisons::actions::{run_comparison, CompareRequest};
use crate::domains::comparisons::models::ComparisonResult;
use crate::server::app::AppState;

/// `POST /compare` response body.
///
/// `id` is null when the result could not be persisted; the comparison
/// itself is still returned.
#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub result: ComparisonResult,
    pub id: Option<Uuid>,
}

/// Compare two things with the LLM and persist the exchange.
pub async fn compare_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<CompareResponse>, ApiError> {
    let (result, persistence) = run_comparison(&state.deps, &request).await?;

    Ok(Json(CompareResponse {
        result,
        id: persistence.id(),
    }))
}
