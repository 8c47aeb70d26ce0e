//! Defensive decoding of the model's reply.
//!
//! The completion text is adversarial input, not a trusted RPC response: the
//! model is asked for raw JSON but is not guaranteed to obey. Decoding is a
//! schema-validating step that produces a tagged success/failure result;
//! malformed payloads are rejected, never coerced.

use openai_client::strip_code_blocks;
use thiserror::Error;

use super::models::ComparisonResult;

#[derive(Debug, Error)]
pub enum DecodeError {
    /// The text was not JSON at all
    #[error("completion is not valid JSON: {0}")]
    NotJson(#[source] serde_json::Error),

    /// Valid JSON, wrong shape (missing required field, wrong type)
    #[error("completion JSON does not match the comparison schema: {0}")]
    WrongShape(#[source] serde_json::Error),
}

/// Decode a completion into a [`ComparisonResult`].
///
/// Markdown code fences are stripped first since models wrap output in them
/// despite instructions. Absent and `null` array fields become empty
/// vectors; a missing `summary`, `verdict`, or `funTitle` is a failure.
pub fn decode_comparison(raw: &str) -> Result<ComparisonResult, DecodeError> {
    let cleaned = strip_code_blocks(raw);

    let value: serde_json::Value =
        serde_json::from_str(cleaned).map_err(DecodeError::NotJson)?;

    serde_json::from_value(value).map_err(DecodeError::WrongShape)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_PAYLOAD: &str = r#"{
        "summary": "Close call between two hatchbacks.",
        "aspects": [
            {"name": "Price", "itemA": "Cheaper", "itemB": "Holds value"}
        ],
        "prosA": ["Affordable"],
        "consA": ["Dated interior"],
        "prosB": ["Fun to drive"],
        "consB": ["Costs more"],
        "verdict": "Take B if the budget allows.",
        "funTitle": "Battle of the Hatchbacks"
    }"#;

    #[test]
    fn test_decodes_full_payload() {
        let result = decode_comparison(FULL_PAYLOAD).unwrap();
        assert_eq!(result.summary, "Close call between two hatchbacks.");
        assert_eq!(result.aspects.len(), 1);
        assert_eq!(result.aspects[0].item_b, "Holds value");
        assert_eq!(result.fun_title, "Battle of the Hatchbacks");
    }

    #[test]
    fn test_strips_code_fences() {
        let fenced = format!("```json\n{}\n```", FULL_PAYLOAD);
        let result = decode_comparison(&fenced).unwrap();
        assert_eq!(result.verdict, "Take B if the budget allows.");
    }

    #[test]
    fn test_rejects_non_json() {
        let err = decode_comparison("Sure! Here is the comparison you asked for.");
        assert!(matches!(err, Err(DecodeError::NotJson(_))));
    }

    #[test]
    fn test_rejects_wrong_shape() {
        // Valid JSON, but aspects is not an array of objects
        let err = decode_comparison(
            r#"{"summary": "s", "aspects": "none", "verdict": "v", "funTitle": "f"}"#,
        );
        assert!(matches!(err, Err(DecodeError::WrongShape(_))));
    }

    #[test]
    fn test_rejects_missing_required_field() {
        let err = decode_comparison(r#"{"summary": "s", "verdict": "v"}"#);
        assert!(matches!(err, Err(DecodeError::WrongShape(_))));
    }

    #[test]
    fn test_defaults_missing_arrays() {
        let result = decode_comparison(
            r#"{"summary": "s", "verdict": "v", "funTitle": "f", "prosA": null}"#,
        )
        .unwrap();
        assert!(result.pros_a.is_empty());
        assert!(result.cons_b.is_empty());
        assert!(result.aspects.is_empty());
    }

    #[test]
    fn test_ignores_unknown_fields() {
        let result = decode_comparison(
            r#"{"summary": "s", "verdict": "v", "funTitle": "f", "confidence": 0.9}"#,
        )
        .unwrap();
        assert_eq!(result.summary, "s");
    }
}
