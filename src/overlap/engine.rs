//! Overlap Engine: compares one domain's target facts against buyer facts.
//!
//! Facts are first grouped by a coarse key (category, falling back to
//! vendor) so candidate pairs stay bounded instead of exhaustive n×m
//! comparison. Each group becomes one batched comparison request; the
//! capability returns classified pairs which are validated and deduped
//! (first classification wins for a repeated pair).

use super::prompt::build_comparison_prompt;
use super::response::parse_comparison_rows;
use crate::llm::{BackendError, ChatMessage, LlmClient, LlmRequest};
use crate::model::{Domain, Fact, FactId, OverlapCandidate, OverlapId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum OverlapError {
    #[error("capability call failed: {0}")]
    Backend(#[from] BackendError),

    #[error("malformed comparison response: {0}")]
    MalformedResponse(String),
}

/// Result of overlap detection for one domain.
#[derive(Debug, Clone)]
pub struct OverlapSet {
    pub domain: Domain,
    pub candidates: Vec<OverlapCandidate>,
    /// Rows the capability proposed that failed validation (unknown fact
    /// id, missing both sides, unrecognized classification). Kept for the
    /// audit trail.
    pub rejected_pairs: u32,
}

impl OverlapSet {
    pub fn empty(domain: Domain) -> Self {
        Self {
            domain,
            candidates: Vec::new(),
            rejected_pairs: 0,
        }
    }
}

pub struct OverlapEngine {
    llm: Arc<dyn LlmClient>,
    vendor_match_threshold: f64,
}

struct ComparisonGroup<'a> {
    key: String,
    target: Vec<&'a Fact>,
    buyer: Vec<&'a Fact>,
}

impl<'a> ComparisonGroup<'a> {
    fn len(&self) -> usize {
        self.target.len() + self.buyer.len()
    }
}

impl OverlapEngine {
    pub fn new(llm: Arc<dyn LlmClient>, vendor_match_threshold: f64) -> Self {
        Self {
            llm,
            vendor_match_threshold,
        }
    }

    /// Detects overlaps for one domain.
    ///
    /// An empty partition on either side is a valid input; the engine still
    /// runs and may legitimately return zero candidates. An error means the
    /// whole domain degrades to zero candidates at the pipeline level;
    /// sibling domains are unaffected.
    pub async fn detect(
        &self,
        domain: Domain,
        target_facts: &[Fact],
        buyer_facts: &[Fact],
    ) -> Result<OverlapSet, OverlapError> {
        if target_facts.is_empty() && buyer_facts.is_empty() {
            debug!(domain = %domain, "no facts on either side, skipping comparison");
            return Ok(OverlapSet::empty(domain));
        }

        let groups = group_facts(target_facts, buyer_facts, self.vendor_match_threshold);
        debug!(
            domain = %domain,
            groups = groups.len(),
            "comparing {} target facts against {} buyer facts",
            target_facts.len(),
            buyer_facts.len()
        );

        let target_ids: HashMap<&str, &Fact> = target_facts
            .iter()
            .map(|f| (f.id.as_str(), f))
            .collect();
        let buyer_ids: HashMap<&str, &Fact> =
            buyer_facts.iter().map(|f| (f.id.as_str(), f)).collect();

        let mut seen_pairs: HashSet<(Option<FactId>, Option<FactId>)> = HashSet::new();
        let mut candidates = Vec::new();
        let mut rejected_pairs = 0u32;
        let mut seq = 1u32;

        for group in &groups {
            let prompt = build_comparison_prompt(domain, &group.target, &group.buyer);
            let request = LlmRequest::new(vec![ChatMessage::user(prompt)])
                .with_temperature(0.1)
                .with_max_tokens(2000);

            let response = self.llm.chat(request).await?;
            let rows = parse_comparison_rows(&response.content)?;

            for row in rows {
                let target_fact = match resolve(&row.target_fact_id, &target_ids) {
                    Ok(id) => id,
                    Err(unknown) => {
                        warn!(domain = %domain, fact = %unknown, "rejecting pair citing unknown target fact");
                        rejected_pairs += 1;
                        continue;
                    }
                };
                let buyer_fact = match resolve(&row.buyer_fact_id, &buyer_ids) {
                    Ok(id) => id,
                    Err(unknown) => {
                        warn!(domain = %domain, fact = %unknown, "rejecting pair citing unknown buyer fact");
                        rejected_pairs += 1;
                        continue;
                    }
                };
                if target_fact.is_none() && buyer_fact.is_none() {
                    warn!(domain = %domain, "rejecting pair citing no facts at all");
                    rejected_pairs += 1;
                    continue;
                }
                let classification = match row.classification() {
                    Some(c) => c,
                    None => {
                        warn!(
                            domain = %domain,
                            classification = %row.classification_raw,
                            "rejecting pair with unrecognized classification"
                        );
                        rejected_pairs += 1;
                        continue;
                    }
                };

                // First classification wins for a repeated fact pair.
                let pair_key = (target_fact.clone(), buyer_fact.clone());
                if !seen_pairs.insert(pair_key) {
                    debug!(domain = %domain, "dropping duplicate fact pair");
                    continue;
                }

                candidates.push(OverlapCandidate {
                    id: OverlapId::new(domain, seq),
                    domain,
                    classification,
                    target_fact,
                    buyer_fact,
                    rationale: row.rationale.unwrap_or_default(),
                });
                seq += 1;
            }
        }

        debug!(
            domain = %domain,
            candidates = candidates.len(),
            rejected = rejected_pairs,
            "overlap detection complete"
        );

        Ok(OverlapSet {
            domain,
            candidates,
            rejected_pairs,
        })
    }
}

fn resolve<'a>(
    raw: &Option<String>,
    known: &HashMap<&str, &'a Fact>,
) -> Result<Option<FactId>, String> {
    match raw {
        None => Ok(None),
        Some(id) if id.trim().is_empty() || id == "null" => Ok(None),
        Some(id) => match known.get(id.as_str()) {
            Some(fact) => Ok(Some(fact.id.clone())),
            None => Err(id.clone()),
        },
    }
}

/// Groups facts by coarse key: category when present, vendor otherwise,
/// a residual "general" group for facts with neither. Keys are fuzzy-matched
/// (Jaro-Winkler) so "Endpoint Protection" and "endpoint protection suite"
/// land together. Groups too small to compare on their own are folded into
/// the residual group.
fn group_facts<'a>(
    target: &'a [Fact],
    buyer: &'a [Fact],
    threshold: f64,
) -> Vec<ComparisonGroup<'a>> {
    let mut groups: Vec<ComparisonGroup<'a>> = Vec::new();

    let mut place = |fact: &'a Fact, is_target: bool| {
        let key = coarse_key(fact);
        let slot = groups
            .iter()
            .position(|g| strsim::jaro_winkler(&g.key, &key) >= threshold);
        let group = match slot {
            Some(idx) => &mut groups[idx],
            None => {
                groups.push(ComparisonGroup {
                    key,
                    target: Vec::new(),
                    buyer: Vec::new(),
                });
                groups.last_mut().unwrap()
            }
        };
        if is_target {
            group.target.push(fact);
        } else {
            group.buyer.push(fact);
        }
    };

    for fact in target {
        place(fact, true);
    }
    for fact in buyer {
        place(fact, false);
    }

    // Fold singleton groups into the residual group so they still get
    // compared without costing one request each.
    let (small, mut rest): (Vec<_>, Vec<_>) = groups.into_iter().partition(|g| g.len() < 2);
    if !small.is_empty() {
        let residual_idx = rest.iter().position(|g| g.key == RESIDUAL_KEY);
        let mut residual = match residual_idx {
            Some(idx) => rest.remove(idx),
            None => ComparisonGroup {
                key: RESIDUAL_KEY.to_string(),
                target: Vec::new(),
                buyer: Vec::new(),
            },
        };
        for group in small {
            residual.target.extend(group.target);
            residual.buyer.extend(group.buyer);
        }
        rest.push(residual);
    }
    rest
}

const RESIDUAL_KEY: &str = "general";

fn coarse_key(fact: &Fact) -> String {
    fact.attributes
        .category
        .as_deref()
        .or(fact.attributes.vendor.as_deref())
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| RESIDUAL_KEY.to_string())
}
