//! Request-boundary error taxonomy.
//!
//! Every failure a handler can hit is converted into one of these variants
//! and rendered as a structured `{"error": "..."}` JSON body. Nothing past
//! the router boundary panics or returns a raw body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Required input fields missing or blank
    #[error("Both items are required")]
    InvalidInput,

    /// Permalink path segment missing or the literal "undefined"
    #[error("The link doesn't contain a valid comparison ID")]
    InvalidLink,

    /// Comparison record does not exist (or the lookup query failed)
    #[error("Comparison not found")]
    NotFound,

    /// The model returned no text at all
    #[error("Empty response from AI.")]
    EmptyCompletion,

    /// The model returned text that does not decode into the comparison schema
    #[error("AI response could not be parsed. Try again with simpler descriptions.")]
    UnparsableCompletion,

    /// The completion API call itself failed (network, auth, rate limit)
    #[error("Something went wrong while comparing.")]
    Upstream(#[source] anyhow::Error),

    /// A read query against the comparison store failed
    #[error("{0}")]
    StorageRead(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput | ApiError::InvalidLink => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::EmptyCompletion
            | ApiError::UnparsableCompletion
            | ApiError::Upstream(_)
            | ApiError::StorageRead(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
