//! The four comparison operations behind the HTTP surface.
//!
//! Handlers stay thin; everything testable lives here against the kernel
//! traits so the suite can swap in mocks for the LLM and the store.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{error, warn};
use uuid::Uuid;

use crate::common::errors::ApiError;
use crate::kernel::{ServerDeps, COMPARE_TEMPERATURE, GPT_4O_MINI};
use crate::kernel::traits::BaseComparisonStore;

use super::models::{
    ComparisonRecord, ComparisonResult, NewComparison, RecentComparison, TrendRow,
    TrendingComparison,
};
use super::parse::decode_comparison;
use super::prompt::build_prompt;

/// How many rows the recency list returns.
pub const RECENT_LIMIT: i64 = 5;

/// How many recent rows trending samples. A fixed window bounds staleness
/// and query cost; this is NOT all-time frequency.
pub const TREND_WINDOW: i64 = 100;

/// How many trending groups are returned.
pub const TREND_TOP: usize = 5;

/// The `POST /compare` request body.
///
/// `templateKey` and `tone` are free-form tags: the client enumerates known
/// values but the server stores whatever arrives, unvalidated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompareRequest {
    #[serde(rename = "itemA", default)]
    pub item_a: Option<String>,
    #[serde(rename = "itemB", default)]
    pub item_b: Option<String>,
    #[serde(default)]
    pub criteria: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(rename = "templateKey", default)]
    pub template_key: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
}

/// Outcome of the fire-and-forget insert after a successful comparison.
///
/// An explicit type rather than a swallowed error, so the response builder
/// and observability hooks can both see write failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    Persisted(Uuid),
    Failed,
}

impl Persistence {
    /// The shareable id, when the record made it to storage.
    pub fn id(&self) -> Option<Uuid> {
        match self {
            Persistence::Persisted(id) => Some(*id),
            Persistence::Failed => None,
        }
    }
}

/// Run one comparison: validate, prompt, complete, decode, persist.
///
/// Persistence failure does not fail the request - the caller still gets
/// the result, just without a shareable id. No step is retried.
pub async fn run_comparison(
    deps: &ServerDeps,
    request: &CompareRequest,
) -> Result<(ComparisonResult, Persistence), ApiError> {
    let item_a = required_item(request.item_a.as_deref())?;
    let item_b = required_item(request.item_b.as_deref())?;

    // Blank criteria means "no criteria", same as the field being absent
    let criteria = request
        .criteria
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(str::to_string);

    let prompt = build_prompt(
        item_a,
        item_b,
        criteria.as_deref(),
        request.tone.as_deref(),
        request.mode.as_deref(),
    );

    let completion = deps
        .completion
        .complete(&prompt.system, &prompt.user, GPT_4O_MINI, COMPARE_TEMPERATURE)
        .await
        .map_err(ApiError::Upstream)?;

    let text = match completion {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Err(ApiError::EmptyCompletion),
    };

    let result = decode_comparison(&text).map_err(|e| {
        error!(error = %e, completion = %text, "model reply failed to decode");
        ApiError::UnparsableCompletion
    })?;

    let record = NewComparison {
        template: request.template_key.clone(),
        tone: request.tone.clone(),
        criteria,
        item_a: item_a.to_string(),
        item_b: item_b.to_string(),
        result: result.clone(),
    };

    let persistence = match deps.store.insert(&record).await {
        Ok(id) => Persistence::Persisted(id),
        Err(e) => {
            warn!(error = %e, "comparison insert failed; returning result without share id");
            Persistence::Failed
        }
    };

    Ok((result, persistence))
}

fn required_item(value: Option<&str>) -> Result<&str, ApiError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ApiError::InvalidInput),
    }
}

/// The most recent comparisons, newest first.
pub async fn recent_comparisons(
    store: &dyn BaseComparisonStore,
) -> Result<Vec<RecentComparison>, ApiError> {
    store
        .recent(RECENT_LIMIT)
        .await
        .map_err(|e| {
            error!(error = %e, "recent comparisons query failed");
            ApiError::StorageRead("Failed to load recent comparisons".to_string())
        })
}

/// The most frequent comparisons across the recent window.
pub async fn trending_comparisons(
    store: &dyn BaseComparisonStore,
) -> Result<Vec<TrendingComparison>, ApiError> {
    let rows = store.trend_window(TREND_WINDOW).await.map_err(|e| {
        error!(error = %e, "trending window query failed");
        ApiError::StorageRead("Failed to load trending comparisons.".to_string())
    })?;

    Ok(aggregate_trending(rows, TREND_TOP))
}

/// Group rows by the exact `(item_a, item_b, template)` triple and rank by
/// count.
///
/// Grouping is literal: case, whitespace, and a NULL template all
/// distinguish groups - no normalization. Ties keep first-seen order (the
/// sort is stable over encounter order).
pub fn aggregate_trending(rows: Vec<TrendRow>, top: usize) -> Vec<TrendingComparison> {
    let mut groups: Vec<TrendingComparison> = Vec::new();
    let mut index: HashMap<(String, String, Option<String>), usize> = HashMap::new();

    for row in rows {
        let key = (row.item_a, row.item_b, row.template);
        match index.get(&key) {
            Some(&i) => groups[i].count += 1,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(TrendingComparison {
                    item_a: key.0,
                    item_b: key.1,
                    template: key.2,
                    count: 1,
                });
            }
        }
    }

    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups.truncate(top);
    groups
}

/// Look up one shared comparison from a permalink path segment.
///
/// A missing segment or the literal "undefined" (a client-side bug
/// artifact) is an invalid link and never touches storage. An id that is
/// not a UUID cannot match any record, so it is a plain not-found, also
/// without a query. Lookup errors render as not-found rather than a 500.
pub async fn shared_comparison(
    store: &dyn BaseComparisonStore,
    id_segment: &str,
) -> Result<ComparisonRecord, ApiError> {
    if id_segment.is_empty() || id_segment == "undefined" {
        return Err(ApiError::InvalidLink);
    }

    let id = match Uuid::parse_str(id_segment) {
        Ok(id) => id,
        Err(_) => return Err(ApiError::NotFound),
    };

    match store.find_by_id(id).await {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(ApiError::NotFound),
        Err(e) => {
            error!(error = %e, %id, "comparison lookup failed");
            Err(ApiError::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use crate::kernel::test_dependencies::{MockCompletion, MockComparisonStore};

    use super::*;

    const VALID_REPLY: &str = r#"{
        "summary": "Both get you to work.",
        "aspects": [{"name": "Cost", "itemA": "Lower", "itemB": "Higher"}],
        "prosA": ["Cheap"],
        "consA": ["Slow"],
        "prosB": ["Fast"],
        "consB": ["Expensive"],
        "verdict": "Depends on the commute.",
        "funTitle": "Bus vs Bike"
    }"#;

    fn request(item_a: &str, item_b: &str) -> CompareRequest {
        CompareRequest {
            item_a: Some(item_a.to_string()),
            item_b: Some(item_b.to_string()),
            ..Default::default()
        }
    }

    fn deps(completion: MockCompletion, store: MockComparisonStore) -> (ServerDeps, Arc<MockComparisonStore>, Arc<MockCompletion>) {
        let store = Arc::new(store);
        let completion = Arc::new(completion);
        (
            ServerDeps::new(store.clone(), completion.clone()),
            store,
            completion,
        )
    }

    #[tokio::test]
    async fn test_successful_comparison_persists_and_returns_id() {
        let (deps, store, completion) =
            deps(MockCompletion::new().with_response(VALID_REPLY), MockComparisonStore::new());

        let (result, persistence) = run_comparison(&deps, &request("the bus", "a bike"))
            .await
            .unwrap();

        assert_eq!(result.fun_title, "Bus vs Bike");
        assert!(persistence.id().is_some());
        assert_eq!(store.inserts().len(), 1);
        assert_eq!(store.inserts()[0].item_a, "the bus");

        let calls = completion.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, GPT_4O_MINI);
        assert_eq!(calls[0].temperature, COMPARE_TEMPERATURE);
        assert!(calls[0].user_prompt.contains("the bus"));
    }

    #[tokio::test]
    async fn test_blank_items_are_invalid_regardless_of_other_fields() {
        let (deps, store, completion) = deps(MockCompletion::new(), MockComparisonStore::new());

        for (a, b) in [("", "a bike"), ("the bus", "   "), ("", "")] {
            let mut req = request(a, b);
            req.criteria = Some("comfort".to_string());
            req.tone = Some("chaotic".to_string());

            let err = run_comparison(&deps, &req).await.unwrap_err();
            assert!(matches!(err, ApiError::InvalidInput));
        }

        let missing = CompareRequest::default();
        let err = run_comparison(&deps, &missing).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput));

        // Nothing downstream ran
        assert!(completion.calls().is_empty());
        assert!(store.inserts().is_empty());
    }

    #[tokio::test]
    async fn test_non_json_reply_is_unparsable_and_not_persisted() {
        let (deps, store, _) = deps(
            MockCompletion::new().with_response("I'd be happy to compare those!"),
            MockComparisonStore::new(),
        );

        let err = run_comparison(&deps, &request("a", "b")).await.unwrap_err();
        assert!(matches!(err, ApiError::UnparsableCompletion));
        assert!(store.inserts().is_empty());
    }

    #[tokio::test]
    async fn test_empty_reply_is_empty_completion() {
        let (deps, _, _) = deps(
            MockCompletion::new().with_empty_response(),
            MockComparisonStore::new(),
        );

        let err = run_comparison(&deps, &request("a", "b")).await.unwrap_err();
        assert!(matches!(err, ApiError::EmptyCompletion));
    }

    #[tokio::test]
    async fn test_whitespace_reply_is_empty_completion() {
        let (deps, _, _) = deps(
            MockCompletion::new().with_response("   \n"),
            MockComparisonStore::new(),
        );

        let err = run_comparison(&deps, &request("a", "b")).await.unwrap_err();
        assert!(matches!(err, ApiError::EmptyCompletion));
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let (deps, store, _) = deps(
            MockCompletion::new().with_failure("rate limited"),
            MockComparisonStore::new(),
        );

        let err = run_comparison(&deps, &request("a", "b")).await.unwrap_err();
        assert!(matches!(err, ApiError::Upstream(_)));
        assert!(store.inserts().is_empty());
    }

    #[tokio::test]
    async fn test_insert_failure_still_returns_result_without_id() {
        let (deps, store, _) = deps(
            MockCompletion::new().with_response(VALID_REPLY),
            MockComparisonStore::new().with_failing_inserts(),
        );

        let (result, persistence) = run_comparison(&deps, &request("a", "b"))
            .await
            .unwrap();

        assert_eq!(result.summary, "Both get you to work.");
        assert_eq!(persistence, Persistence::Failed);
        assert_eq!(persistence.id(), None);
        // The insert was attempted exactly once, no retry
        assert_eq!(store.inserts().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_criteria_treated_as_absent() {
        let (deps, store, completion) = deps(
            MockCompletion::new().with_response(VALID_REPLY),
            MockComparisonStore::new(),
        );

        let mut req = request("a", "b");
        req.criteria = Some("   ".to_string());
        run_comparison(&deps, &req).await.unwrap();

        assert!(completion.calls()[0].user_prompt.contains("common sense"));
        assert_eq!(store.inserts()[0].criteria, None);
    }

    #[tokio::test]
    async fn test_template_and_tone_stored_unvalidated() {
        let (deps, store, _) = deps(
            MockCompletion::new().with_response(VALID_REPLY),
            MockComparisonStore::new(),
        );

        let mut req = request("a", "b");
        req.template_key = Some("spaceships".to_string());
        req.tone = Some("deadpan".to_string());
        run_comparison(&deps, &req).await.unwrap();

        let inserted = &store.inserts()[0];
        assert_eq!(inserted.template.as_deref(), Some("spaceships"));
        assert_eq!(inserted.tone.as_deref(), Some("deadpan"));
    }

    #[tokio::test]
    async fn test_recent_passes_rows_through() {
        let rows: Vec<RecentComparison> = (0..3)
            .map(|i| RecentComparison {
                id: Uuid::new_v4(),
                created_at: Utc::now(),
                template: None,
                tone: None,
                criteria: None,
                item_a: format!("a{}", i),
                item_b: format!("b{}", i),
            })
            .collect();

        let store = MockComparisonStore::new().with_recent(rows.clone());
        let listed = recent_comparisons(&store).await.unwrap();

        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].item_a, "a0");
    }

    #[tokio::test]
    async fn test_recent_read_failure_is_an_error_not_a_partial_list() {
        let store = MockComparisonStore::new().with_failing_reads();
        let err = recent_comparisons(&store).await.unwrap_err();
        assert!(matches!(err, ApiError::StorageRead(_)));
    }

    fn trend_row(a: &str, b: &str, template: Option<&str>) -> TrendRow {
        TrendRow {
            item_a: a.to_string(),
            item_b: b.to_string(),
            template: template.map(str::to_string),
        }
    }

    #[test]
    fn test_aggregate_counts_exact_triples() {
        let rows = vec![
            trend_row("cats", "dogs", None),
            trend_row("tea", "coffee", Some("generic")),
            trend_row("cats", "dogs", None),
            trend_row("cats", "dogs", Some("generic")),
            trend_row("cats", "dogs", None),
        ];

        let top = aggregate_trending(rows, 5);

        assert_eq!(top[0].count, 3);
        assert_eq!(top[0].item_a, "cats");
        assert_eq!(top[0].template, None);
        // The template-tagged duplicate is its own group
        assert!(top
            .iter()
            .any(|t| t.item_a == "cats" && t.template.as_deref() == Some("generic") && t.count == 1));
    }

    #[test]
    fn test_aggregate_does_not_normalize() {
        let rows = vec![
            trend_row("Cats", "Dogs", None),
            trend_row("cats", "dogs", None),
            trend_row("cats ", "dogs", None),
        ];

        let top = aggregate_trending(rows, 5);
        assert_eq!(top.len(), 3);
        assert!(top.iter().all(|t| t.count == 1));
    }

    #[test]
    fn test_aggregate_ties_keep_first_seen_order() {
        let rows = vec![
            trend_row("x", "y", None),
            trend_row("p", "q", None),
            trend_row("m", "n", None),
        ];

        let top = aggregate_trending(rows, 5);
        assert_eq!(top[0].item_a, "x");
        assert_eq!(top[1].item_a, "p");
        assert_eq!(top[2].item_a, "m");
    }

    #[test]
    fn test_aggregate_truncates_to_top() {
        let rows: Vec<TrendRow> = (0..10)
            .map(|i| trend_row(&format!("a{}", i), "b", None))
            .collect();

        assert_eq!(aggregate_trending(rows, 5).len(), 5);
    }

    #[test]
    fn test_aggregate_empty_window_is_empty_not_an_error() {
        assert!(aggregate_trending(Vec::new(), 5).is_empty());
    }

    #[tokio::test]
    async fn test_trending_read_failure_is_storage_read() {
        let store = MockComparisonStore::new().with_failing_reads();
        let err = trending_comparisons(&store).await.unwrap_err();
        assert!(matches!(err, ApiError::StorageRead(_)));
    }

    fn record() -> ComparisonRecord {
        ComparisonRecord {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            template: Some("cars".to_string()),
            tone: Some("balanced".to_string()),
            criteria: Some("reliability".to_string()),
            item_a: "Corolla".to_string(),
            item_b: "Mazda 3".to_string(),
            result: serde_json::from_str(VALID_REPLY).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_shared_lookup_returns_full_record() {
        let record = record();
        let store = MockComparisonStore::new().with_record(record.clone());

        let found = shared_comparison(&store, &record.id.to_string())
            .await
            .unwrap();

        assert_eq!(found, record);
    }

    #[tokio::test]
    async fn test_shared_lookup_undefined_never_queries() {
        let store = MockComparisonStore::new();

        let err = shared_comparison(&store, "undefined").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidLink));

        let err = shared_comparison(&store, "").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidLink));

        assert!(store.find_calls().is_empty());
    }

    #[tokio::test]
    async fn test_shared_lookup_non_uuid_is_not_found_without_query() {
        let store = MockComparisonStore::new();

        let err = shared_comparison(&store, "not-a-uuid").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
        assert!(store.find_calls().is_empty());
    }

    #[tokio::test]
    async fn test_shared_lookup_missing_record_is_not_found() {
        let store = MockComparisonStore::new();

        let err = shared_comparison(&store, &Uuid::new_v4().to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
        assert_eq!(store.find_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_shared_lookup_read_failure_renders_not_found() {
        let store = MockComparisonStore::new().with_failing_reads();

        let err = shared_comparison(&store, &Uuid::new_v4().to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[tokio::test]
    async fn test_round_trip_through_store() {
        let (deps, store, _) = deps(
            MockCompletion::new().with_response(VALID_REPLY),
            MockComparisonStore::new(),
        );

        let mut req = request("Corolla", "Mazda 3");
        req.criteria = Some("reliability".to_string());
        req.tone = Some("serious".to_string());
        req.template_key = Some("cars".to_string());

        let (result, persistence) = run_comparison(&deps, &req).await.unwrap();
        let id = persistence.id().unwrap();

        let read_back = shared_comparison(store.as_ref(), &id.to_string())
            .await
            .unwrap();

        assert_eq!(read_back.item_a, "Corolla");
        assert_eq!(read_back.item_b, "Mazda 3");
        assert_eq!(read_back.criteria.as_deref(), Some("reliability"));
        assert_eq!(read_back.tone.as_deref(), Some("serious"));
        assert_eq!(read_back.template.as_deref(), Some("cars"));
        assert_eq!(read_back.result, result);
    }
}
