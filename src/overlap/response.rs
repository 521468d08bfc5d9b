//! Parsing and schema validation of comparison responses.

use super::engine::OverlapError;
use crate::llm::extract_json;
use crate::model::OverlapClass;
use serde::Deserialize;

/// One classified pair as the capability proposes it, before validation.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ComparisonRow {
    #[serde(default)]
    pub target_fact_id: Option<String>,
    #[serde(default)]
    pub buyer_fact_id: Option<String>,
    #[serde(rename = "classification")]
    pub classification_raw: String,
    #[serde(default)]
    pub rationale: Option<String>,
}

impl ComparisonRow {
    pub fn classification(&self) -> Option<OverlapClass> {
        match self.classification_raw.trim() {
            "platform_alignment" => Some(OverlapClass::PlatformAlignment),
            "platform_mismatch" => Some(OverlapClass::PlatformMismatch),
            "capability_gap" => Some(OverlapClass::CapabilityGap),
            "capability_overlap" => Some(OverlapClass::CapabilityOverlap),
            _ => None,
        }
    }
}

/// Wrapper shape some models prefer over a bare array.
#[derive(Debug, Deserialize)]
struct WrappedRows {
    pairs: Vec<ComparisonRow>,
}

pub(crate) fn parse_comparison_rows(content: &str) -> Result<Vec<ComparisonRow>, OverlapError> {
    let payload = extract_json(content).ok_or_else(|| {
        OverlapError::MalformedResponse(format!(
            "no JSON payload in response: {}",
            content.chars().take(120).collect::<String>()
        ))
    })?;

    if let Ok(rows) = serde_json::from_str::<Vec<ComparisonRow>>(payload) {
        return Ok(rows);
    }
    serde_json::from_str::<WrappedRows>(payload)
        .map(|w| w.pairs)
        .map_err(|e| OverlapError::MalformedResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_bare_array() {
        let rows = parse_comparison_rows(
            r#"[{"target_fact_id": "t1", "buyer_fact_id": "b1", "classification": "platform_alignment"}]"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].classification(), Some(OverlapClass::PlatformAlignment));
        assert!(rows[0].rationale.is_none());
    }

    #[test]
    fn test_parses_wrapped_object() {
        let rows = parse_comparison_rows(
            r#"{"pairs": [{"target_fact_id": "t1", "buyer_fact_id": null, "classification": "capability_gap", "rationale": "x"}]}"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].buyer_fact_id.is_none());
    }

    #[test]
    fn test_parses_fenced_array() {
        let rows = parse_comparison_rows(
            "```json\n[{\"classification\": \"capability_overlap\"}]\n```",
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_unknown_classification_is_none_not_error() {
        let rows = parse_comparison_rows(
            r#"[{"target_fact_id": "t1", "classification": "kind_of_similar"}]"#,
        )
        .unwrap();
        assert_eq!(rows[0].classification(), None);
    }

    #[test]
    fn test_prose_is_malformed() {
        let result = parse_comparison_rows("I am unable to compare these estates.");
        assert!(matches!(result, Err(OverlapError::MalformedResponse(_))));
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        let result = parse_comparison_rows(r#"{"findings": []}"#);
        assert!(matches!(result, Err(OverlapError::MalformedResponse(_))));
    }
}
