//! Raw finding shapes as the capability returns them, before the
//! validation gate.

use super::orchestrator::ReasoningError;
use crate::llm::extract_json;
use crate::model::{Domain, Priority, Severity, WorkPhase};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawFindings {
    #[serde(default)]
    pub risks: Vec<RawFinding>,
    #[serde(default)]
    pub work_items: Vec<RawFinding>,
    #[serde(default)]
    pub recommendations: Vec<RawFinding>,
    #[serde(default)]
    pub strategic_considerations: Vec<RawFinding>,
}

/// One candidate finding; variant-specific fields are all optional here and
/// interpreted during conversion.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawFinding {
    pub description: String,
    #[serde(default)]
    pub citations: Vec<String>,
    #[serde(default)]
    pub overlap_id: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub cost_category: Option<String>,
    #[serde(default)]
    pub base_cost: Option<f64>,
    #[serde(default)]
    pub target_action: Option<String>,
    #[serde(default)]
    pub integration_option: Option<String>,
}

impl RawFinding {
    /// Lenient scale parsing: the gate rejects findings on citation
    /// integrity, not on a misspelled severity, which degrades to the
    /// middle of the scale.
    pub fn severity(&self) -> Severity {
        match self.severity.as_deref().map(str::trim) {
            Some("low") => Severity::Low,
            Some("medium") => Severity::Medium,
            Some("high") => Severity::High,
            Some("critical") => Severity::Critical,
            _ => Severity::Medium,
        }
    }

    pub fn priority(&self) -> Priority {
        match self.priority.as_deref().map(str::trim) {
            Some("low") => Priority::Low,
            Some("medium") => Priority::Medium,
            Some("high") => Priority::High,
            _ => Priority::Medium,
        }
    }

    pub fn phase(&self) -> WorkPhase {
        match self.phase.as_deref().map(str::trim) {
            Some("day_1") | Some("day-1") | Some("day1") => WorkPhase::Day1,
            Some("day_100") | Some("day-100") | Some("day100") => WorkPhase::Day100,
            Some("post_100") | Some("post-100") | Some("post100") => WorkPhase::Post100,
            _ => WorkPhase::Day100,
        }
    }

    pub fn cost_category(&self, fallback: Domain) -> Domain {
        self.cost_category
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(fallback)
    }
}

pub(crate) fn parse_findings(content: &str) -> Result<RawFindings, ReasoningError> {
    let payload = extract_json(content).ok_or_else(|| {
        ReasoningError::MalformedResponse(format!(
            "no JSON payload in response: {}",
            content.chars().take(120).collect::<String>()
        ))
    })?;

    serde_json::from_str(payload).map_err(|e| ReasoningError::MalformedResponse(e.to_string()))
}
