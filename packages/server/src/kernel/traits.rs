// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic. The comparison
// flow (prompting, decoding, trending) lives in domain functions that use
// these traits.
//
// Naming convention: Base* for trait names (e.g., BaseCompletion)

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domains::comparisons::models::{
    ComparisonRecord, NewComparison, RecentComparison, TrendRow,
};

// =============================================================================
// Completion Trait (Infrastructure - LLM text generation)
// =============================================================================

#[async_trait]
pub trait BaseCompletion: Send + Sync {
    /// Generate a text completion from a system and user prompt.
    ///
    /// Returns `Ok(None)` when the upstream API answered successfully but
    /// produced no text; callers decide how to surface that.
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        model: &str,
        temperature: f32,
    ) -> Result<Option<String>>;
}

// =============================================================================
// Comparison Store Trait (Infrastructure - persistence)
// =============================================================================

#[async_trait]
pub trait BaseComparisonStore: Send + Sync {
    /// Insert a comparison, returning the store-assigned id.
    async fn insert(&self, comparison: &NewComparison) -> Result<Uuid>;

    /// The most recent comparisons, newest first, without result payloads.
    async fn recent(&self, limit: i64) -> Result<Vec<RecentComparison>>;

    /// A recent window of `(item_a, item_b, template)` triples for trending.
    async fn trend_window(&self, limit: i64) -> Result<Vec<TrendRow>>;

    /// Look up one full comparison record by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ComparisonRecord>>;
}
