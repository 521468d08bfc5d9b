//! Reasoning Orchestrator: turns one domain's facts, gaps and overlaps into
//! validated findings.
//!
//! The capability's structured output is never trusted: every candidate
//! finding passes a validation gate that checks citation integrity and
//! recomputes the buyer-awareness flag structurally.

use super::prompt::build_findings_prompt;
use super::response::{parse_findings, RawFinding};
use crate::llm::{BackendError, ChatMessage, LlmClient, LlmRequest};
use crate::model::{
    Domain, Entity, Fact, FactId, Finding, FindingId, FindingKind, Gap, OverlapCandidate,
    KIND_RECOMMENDATION, KIND_RISK, KIND_STRATEGIC, KIND_WORK_ITEM,
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ReasoningError {
    #[error("capability call failed: {0}")]
    Backend(#[from] BackendError),

    #[error("malformed findings response: {0}")]
    MalformedResponse(String),
}

/// Findings for one domain, plus the audit counters downstream consumers
/// need to report rejection rates.
#[derive(Debug, Clone)]
pub struct DomainFindings {
    pub domain: Domain,
    pub findings: Vec<Finding>,
    /// Candidate findings rejected outright (no resolvable citation).
    pub rejected: u32,
    /// Individual unknown references stripped from otherwise-valid
    /// findings (fact citations and overlap ids).
    pub stripped_references: u32,
}

impl DomainFindings {
    pub fn empty(domain: Domain) -> Self {
        Self {
            domain,
            findings: Vec::new(),
            rejected: 0,
            stripped_references: 0,
        }
    }
}

pub struct ReasoningOrchestrator {
    llm: Arc<dyn LlmClient>,
}

impl ReasoningOrchestrator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Analyzes one domain. A capability failure degrades this domain to
    /// zero findings at the pipeline level; sibling domains are unaffected.
    pub async fn analyze(
        &self,
        domain: Domain,
        facts: &[Fact],
        gaps: &[Gap],
        overlaps: &[OverlapCandidate],
    ) -> Result<DomainFindings, ReasoningError> {
        if facts.is_empty() {
            // Without facts nothing can be cited, so no finding could pass
            // the gate anyway.
            debug!(domain = %domain, "no facts, skipping reasoning");
            return Ok(DomainFindings::empty(domain));
        }

        let prompt = build_findings_prompt(domain, facts, gaps, overlaps);
        let request = LlmRequest::new(vec![ChatMessage::user(prompt)])
            .with_temperature(0.2)
            .with_max_tokens(4000);

        let response = self.llm.chat(request).await?;
        let raw = parse_findings(&response.content)?;

        let fact_entities: HashMap<&str, Entity> =
            facts.iter().map(|f| (f.id.as_str(), f.entity)).collect();
        let known_overlaps: HashMap<&str, &OverlapCandidate> =
            overlaps.iter().map(|o| (o.id.as_str(), o)).collect();

        let mut gate = ValidationGate {
            domain,
            fact_entities,
            known_overlaps,
            rejected: 0,
            stripped: 0,
        };

        let mut findings = Vec::new();
        for (kind_label, raw_items) in [
            (KIND_RISK, &raw.risks),
            (KIND_WORK_ITEM, &raw.work_items),
            (KIND_RECOMMENDATION, &raw.recommendations),
            (KIND_STRATEGIC, &raw.strategic_considerations),
        ] {
            let mut seq = 1u32;
            for item in raw_items {
                if let Some(finding) = gate.admit(kind_label, seq, item) {
                    findings.push(finding);
                    seq += 1;
                }
            }
        }

        debug!(
            domain = %domain,
            findings = findings.len(),
            rejected = gate.rejected,
            stripped = gate.stripped,
            "reasoning complete"
        );

        Ok(DomainFindings {
            domain,
            findings,
            rejected: gate.rejected,
            stripped_references: gate.stripped,
        })
    }
}

struct ValidationGate<'a> {
    domain: Domain,
    fact_entities: HashMap<&'a str, Entity>,
    known_overlaps: HashMap<&'a str, &'a OverlapCandidate>,
    rejected: u32,
    stripped: u32,
}

impl ValidationGate<'_> {
    /// Applies the validation gate to one candidate finding. Returns
    /// `None` (and records the rejection) when no citation resolves to a
    /// known fact in this domain's input set.
    fn admit(&mut self, kind_label: &str, seq: u32, raw: &RawFinding) -> Option<Finding> {
        let mut citations: Vec<FactId> = Vec::new();
        for cited in &raw.citations {
            if self.fact_entities.contains_key(cited.as_str()) {
                let id = FactId(cited.clone());
                if !citations.contains(&id) {
                    citations.push(id);
                }
            } else {
                warn!(
                    domain = %self.domain,
                    citation = %cited,
                    "stripping citation of unknown fact"
                );
                self.stripped += 1;
            }
        }

        if citations.is_empty() {
            warn!(
                domain = %self.domain,
                kind = kind_label,
                description = %raw.description,
                "rejecting finding without resolvable citations"
            );
            self.rejected += 1;
            return None;
        }

        let overlap_id = match raw.overlap_id.as_deref().filter(|s| !s.is_empty()) {
            Some(id) => match self.known_overlaps.get(id) {
                Some(overlap) => Some(overlap.id.clone()),
                None => {
                    warn!(domain = %self.domain, overlap = id, "stripping unknown overlap reference");
                    self.stripped += 1;
                    None
                }
            },
            None => None,
        };

        // Buyer-awareness is a structural property, not something the
        // capability gets to assert.
        let cites_buyer = citations
            .iter()
            .any(|id| self.fact_entities.get(id.as_str()) == Some(&Entity::Buyer));
        let integration_related = cites_buyer || overlap_id.is_some();

        let kind = match kind_label {
            KIND_RISK => FindingKind::Risk {
                severity: raw.severity(),
            },
            KIND_WORK_ITEM => FindingKind::WorkItem {
                phase: raw.phase(),
                cost_category: raw.cost_category(self.domain),
                base_cost: raw.base_cost.unwrap_or(0.0).max(0.0),
            },
            KIND_RECOMMENDATION => FindingKind::Recommendation {
                priority: raw.priority(),
            },
            _ => FindingKind::StrategicConsideration {
                priority: raw.priority(),
            },
        };

        Some(Finding {
            id: FindingId::new(kind_label, self.domain, seq),
            domain: self.domain,
            kind,
            description: raw.description.trim().to_string(),
            citations,
            overlap_id,
            integration_related,
            target_action: raw.target_action.clone().filter(|s| !s.trim().is_empty()),
            integration_option: raw
                .integration_option
                .clone()
                .filter(|s| !s.trim().is_empty()),
            merged_from: Vec::new(),
        })
    }
}
