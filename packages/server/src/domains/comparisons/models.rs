use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

/// One compared aspect, side by side.
///
/// Wire names are the camelCase the original schema uses; they must survive
/// round-trips through storage byte-for-byte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aspect {
    pub name: String,
    #[serde(rename = "itemA")]
    pub item_a: String,
    #[serde(rename = "itemB")]
    pub item_b: String,
}

/// The fixed comparison schema the model is instructed to emit.
///
/// Untrusted until it has passed `parse::decode_comparison`. String fields
/// are required; absent or `null` array fields decode to empty vectors so a
/// consuming renderer never has to null-check them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub summary: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub aspects: Vec<Aspect>,

    #[serde(rename = "prosA", default, deserialize_with = "null_as_empty")]
    pub pros_a: Vec<String>,

    #[serde(rename = "consA", default, deserialize_with = "null_as_empty")]
    pub cons_a: Vec<String>,

    #[serde(rename = "prosB", default, deserialize_with = "null_as_empty")]
    pub pros_b: Vec<String>,

    #[serde(rename = "consB", default, deserialize_with = "null_as_empty")]
    pub cons_b: Vec<String>,

    pub verdict: String,

    #[serde(rename = "funTitle")]
    pub fun_title: String,
}

/// Treat an explicit `null` the same as an absent field: empty list.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt = Option::<Vec<T>>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// A comparison ready to be persisted (no id or timestamp yet).
#[derive(Debug, Clone)]
pub struct NewComparison {
    pub template: Option<String>,
    pub tone: Option<String>,
    pub criteria: Option<String>,
    pub item_a: String,
    pub item_b: String,
    pub result: ComparisonResult,
}

/// Raw comparisons row - SQL persistence layer
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct ComparisonRow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub template: Option<String>,
    pub tone: Option<String>,
    pub criteria: Option<String>,
    pub item_a: String,
    pub item_b: String,
    pub result: Json<ComparisonResult>,
}

/// A fully persisted comparison, as returned by the permalink lookup.
/// Created exactly once after a successful decode; never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub template: Option<String>,
    pub tone: Option<String>,
    pub criteria: Option<String>,
    pub item_a: String,
    pub item_b: String,
    pub result: ComparisonResult,
}

impl From<ComparisonRow> for ComparisonRecord {
    fn from(row: ComparisonRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            template: row.template,
            tone: row.tone,
            criteria: row.criteria,
            item_a: row.item_a,
            item_b: row.item_b,
            result: row.result.0,
        }
    }
}

/// Recency projection: everything but the result payload (excluded for
/// bandwidth).
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct RecentComparison {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub template: Option<String>,
    pub tone: Option<String>,
    pub criteria: Option<String>,
    pub item_a: String,
    pub item_b: String,
}

/// Trending projection: just the grouping triple.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct TrendRow {
    pub item_a: String,
    pub item_b: String,
    pub template: Option<String>,
}

/// One trending group: a triple plus how often it appeared in the sampled
/// window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendingComparison {
    pub item_a: String,
    pub item_b: String,
    pub template: Option<String>,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_result() -> ComparisonResult {
        ComparisonResult {
            summary: "Both are compact cars.".to_string(),
            aspects: vec![Aspect {
                name: "Reliability".to_string(),
                item_a: "Proven engine".to_string(),
                item_b: "Newer platform".to_string(),
            }],
            pros_a: vec!["Cheap parts".to_string()],
            cons_a: vec!["Old tech".to_string()],
            pros_b: vec!["Better safety".to_string()],
            cons_b: vec!["Pricier".to_string()],
            verdict: "B wins on balance.".to_string(),
            fun_title: "Corolla vs Mazda3".to_string(),
        }
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let json = serde_json::to_value(full_result()).unwrap();
        assert!(json.get("prosA").is_some());
        assert!(json.get("consB").is_some());
        assert!(json.get("funTitle").is_some());
        assert!(json["aspects"][0].get("itemA").is_some());
        // No snake_case leaks onto the wire
        assert!(json.get("pros_a").is_none());
        assert!(json.get("fun_title").is_none());
    }

    #[test]
    fn test_result_round_trips_exactly() {
        let result = full_result();
        let encoded = serde_json::to_string(&result).unwrap();
        let decoded: ComparisonResult = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, result);
    }

    #[test]
    fn test_null_arrays_decode_to_empty() {
        let decoded: ComparisonResult = serde_json::from_str(
            r#"{
                "summary": "s",
                "aspects": null,
                "prosA": null,
                "consA": null,
                "prosB": null,
                "consB": null,
                "verdict": "v",
                "funTitle": "f"
            }"#,
        )
        .unwrap();
        assert!(decoded.aspects.is_empty());
        assert!(decoded.pros_a.is_empty());
        assert!(decoded.cons_b.is_empty());
    }

    #[test]
    fn test_absent_arrays_decode_to_empty() {
        let decoded: ComparisonResult = serde_json::from_str(
            r#"{"summary": "s", "verdict": "v", "funTitle": "f"}"#,
        )
        .unwrap();
        assert!(decoded.aspects.is_empty());
        assert!(decoded.pros_a.is_empty());
    }

    #[test]
    fn test_missing_required_string_is_an_error() {
        let err = serde_json::from_str::<ComparisonResult>(
            r#"{"summary": "s", "verdict": "v"}"#,
        );
        assert!(err.is_err());
    }
}
