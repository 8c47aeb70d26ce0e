//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use openai_client::OpenAIClient;

use crate::domains::comparisons::data::PgComparisonStore;
use crate::kernel::{OpenAICompletion, ServerDeps};
use crate::server::routes::{
    compare_handler, health_handler, recent_handler, shared_comparison_handler,
    trending_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub deps: Arc<ServerDeps>,
}

/// Build the Axum application router
///
/// The completion and storage capabilities are constructed once here and
/// injected through `ServerDeps`, so tests can build the same handlers over
/// mocks.
pub fn build_app(pool: PgPool, openai_api_key: String, allowed_origin: Option<String>) -> Router {
    let completion = Arc::new(OpenAICompletion::new(OpenAIClient::new(openai_api_key)));
    let store = Arc::new(PgComparisonStore::new(pool.clone()));
    let deps = Arc::new(ServerDeps::new(store, completion));

    let state = AppState {
        db_pool: pool,
        deps,
    };

    // CORS: a single configured origin in production, any origin otherwise
    let cors = match allowed_origin
        .as_deref()
        .and_then(|origin| origin.parse::<HeaderValue>().ok())
    {
        Some(origin) => CorsLayer::new().allow_origin(origin),
        None => CorsLayer::new().allow_origin(Any),
    }
    .allow_methods([Method::GET, Method::POST])
    .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/compare", post(compare_handler))
        .route("/recent", get(recent_handler))
        .route("/trending", get(trending_handler))
        .route("/comparisons/:id", get(shared_comparison_handler))
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(state))
        .layer(cors)
        // The compare flow waits on the LLM; bound the whole request anyway
        .layer(TimeoutLayer::new(Duration::from_secs(60)))
        .layer(TraceLayer::new_for_http())
}
