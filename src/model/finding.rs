//! Findings: the four synthesized output variants and their shared envelope.

use super::fact::{Domain, FactId};
use super::overlap::OverlapId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity scale for risks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Priority scale for recommendations and strategic considerations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Integration phase a work item lands in.
///
/// Ordered by urgency: `Day1` sorts lowest so "earliest phase" is the
/// minimum when merging.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum WorkPhase {
    #[serde(rename = "day_1")]
    Day1,
    #[serde(rename = "day_100")]
    Day100,
    #[serde(rename = "post_100")]
    Post100,
}

impl WorkPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkPhase::Day1 => "day_1",
            WorkPhase::Day100 => "day_100",
            WorkPhase::Post100 => "post_100",
        }
    }
}

pub const KIND_RISK: &str = "risk";
pub const KIND_WORK_ITEM: &str = "work_item";
pub const KIND_RECOMMENDATION: &str = "recommendation";
pub const KIND_STRATEGIC: &str = "strategic_consideration";

/// Variant payload of a finding.
///
/// A tagged union rather than four unrelated structures, so consolidation
/// can operate on the shared envelope while staying exhaustive over
/// variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FindingKind {
    Risk {
        severity: Severity,
    },
    WorkItem {
        phase: WorkPhase,
        /// Cost category used by the cost model; one of the six domains.
        cost_category: Domain,
        /// Estimated base cost in the deal currency, before deal-type
        /// multipliers.
        base_cost: f64,
    },
    Recommendation {
        priority: Priority,
    },
    StrategicConsideration {
        priority: Priority,
    },
}

impl FindingKind {
    /// Stable label used for clustering keys and export partitioning.
    pub fn label(&self) -> &'static str {
        match self {
            FindingKind::Risk { .. } => KIND_RISK,
            FindingKind::WorkItem { .. } => KIND_WORK_ITEM,
            FindingKind::Recommendation { .. } => KIND_RECOMMENDATION,
            FindingKind::StrategicConsideration { .. } => KIND_STRATEGIC,
        }
    }
}

/// Finding identifier, e.g. `risk-cybersecurity-002`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FindingId(pub String);

impl FindingId {
    pub fn new(kind_label: &str, domain: Domain, seq: u32) -> Self {
        FindingId(format!("{}-{}-{:03}", kind_label, domain, seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A synthesized, cited conclusion about the target's IT estate.
///
/// Invariants, enforced by the reasoning validation gate before a finding
/// enters any output set:
/// - `citations` is non-empty and every id resolves to a known fact;
/// - `overlap_id.is_some()` implies `integration_related`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub id: FindingId,
    pub domain: Domain,
    #[serde(flatten)]
    pub kind: FindingKind,
    pub description: String,
    /// Cited fact ids, ordered, never empty.
    pub citations: Vec<FactId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlap_id: Option<OverlapId>,
    /// True when resolving this finding requires reconciling target and
    /// buyer systems.
    pub integration_related: bool,
    /// What the target must do regardless of buyer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_action: Option<String>,
    /// What changes if integrating with the specific buyer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integration_option: Option<String>,
    /// Ids of findings merged into this record by consolidation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merged_from: Vec<FindingId>,
}

impl Finding {
    /// Checks the structural invariants shared by all variants.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.citations.is_empty() {
            return Err(format!("finding {} has no citations", self.id));
        }
        if self.overlap_id.is_some() && !self.integration_related {
            return Err(format!(
                "finding {} cites overlap {} but is not integration_related",
                self.id,
                self.overlap_id.as_ref().unwrap()
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Entity;

    fn sample_finding() -> Finding {
        Finding {
            id: FindingId::new(KIND_RISK, Domain::Cybersecurity, 1),
            domain: Domain::Cybersecurity,
            kind: FindingKind::Risk {
                severity: Severity::High,
            },
            description: "EDR platforms conflict".to_string(),
            citations: vec![FactId::new(Entity::Target, Domain::Cybersecurity, 1)],
            overlap_id: None,
            integration_related: false,
            target_action: None,
            integration_option: None,
            merged_from: Vec::new(),
        }
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(
            FindingKind::Risk {
                severity: Severity::Low
            }
            .label(),
            "risk"
        );
        assert_eq!(
            FindingKind::WorkItem {
                phase: WorkPhase::Day1,
                cost_category: Domain::Network,
                base_cost: 1000.0,
            }
            .label(),
            "work_item"
        );
        assert_eq!(
            FindingKind::StrategicConsideration {
                priority: Priority::High
            }
            .label(),
            "strategic_consideration"
        );
    }

    #[test]
    fn test_invariant_empty_citations() {
        let mut finding = sample_finding();
        finding.citations.clear();
        assert!(finding.check_invariants().is_err());
    }

    #[test]
    fn test_invariant_overlap_requires_integration_flag() {
        let mut finding = sample_finding();
        finding.overlap_id = Some(OverlapId::new(Domain::Cybersecurity, 1));
        assert!(finding.check_invariants().is_err());

        finding.integration_related = true;
        assert!(finding.check_invariants().is_ok());
    }

    #[test]
    fn test_phase_ordering() {
        assert!(WorkPhase::Day1 < WorkPhase::Day100);
        assert!(WorkPhase::Day100 < WorkPhase::Post100);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Critical);
        assert_eq!(
            std::cmp::max(Severity::Medium, Severity::High),
            Severity::High
        );
    }

    #[test]
    fn test_kind_serde_is_flat_tagged() {
        let finding = Finding {
            kind: FindingKind::WorkItem {
                phase: WorkPhase::Day100,
                cost_category: Domain::IdentityAccess,
                base_cost: 50_000.0,
            },
            ..sample_finding()
        };
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["kind"], "work_item");
        assert_eq!(json["phase"], "day_100");
        assert_eq!(json["cost_category"], "identity_access");
    }
}
