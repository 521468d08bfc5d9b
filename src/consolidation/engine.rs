//! Consolidation Engine: deduplicates near-identical findings produced
//! independently per domain.
//!
//! Findings are clustered by (variant, domain); within a bucket, two
//! findings merge when their citation sets overlap by at least the
//! configured Jaccard threshold. Merge passes repeat until a fixed point,
//! which is what makes the whole operation idempotent: the output of
//! `consolidate` is, by construction, unchanged by a second application.
//!
//! Every choice in the merge is a pure function of the input set (smallest
//! id wins, longest description wins, maximum severity wins), so the same
//! inputs always produce the same consolidated set.

use crate::model::{Domain, FactId, Finding, FindingKind};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

pub struct ConsolidationEngine {
    similarity_threshold: f64,
}

impl ConsolidationEngine {
    /// `similarity_threshold` is the citation-set Jaccard overlap above
    /// which two findings of the same kind and domain are considered the
    /// same underlying issue. Must be in (0.0, 1.0].
    pub fn new(similarity_threshold: f64) -> Self {
        Self {
            similarity_threshold,
        }
    }

    pub fn consolidate(&self, findings: Vec<Finding>) -> Vec<Finding> {
        let input_len = findings.len();

        let mut buckets: BTreeMap<(&'static str, Domain), Vec<Finding>> = BTreeMap::new();
        for finding in findings {
            buckets
                .entry((finding.kind.label(), finding.domain))
                .or_default()
                .push(finding);
        }

        let mut output = Vec::new();
        for ((_, _), bucket) in buckets {
            output.extend(self.consolidate_bucket(bucket));
        }

        output.sort_by(|a, b| (a.domain, a.kind.label(), &a.id).cmp(&(b.domain, b.kind.label(), &b.id)));
        debug!(
            input = input_len,
            output = output.len(),
            "consolidation complete"
        );
        output
    }

    /// Runs merge passes over one (kind, domain) bucket until no pass
    /// merges anything. A single pass can create clusters whose union
    /// citation set newly exceeds the threshold against a neighbor, so
    /// stopping after one pass would not be a fixed point.
    fn consolidate_bucket(&self, mut bucket: Vec<Finding>) -> Vec<Finding> {
        loop {
            let before = bucket.len();
            bucket = self.merge_pass(bucket);
            if bucket.len() == before {
                return bucket;
            }
        }
    }

    fn merge_pass(&self, mut findings: Vec<Finding>) -> Vec<Finding> {
        findings.sort_by(|a, b| a.id.cmp(&b.id));

        let mut clusters: Vec<(BTreeSet<FactId>, Vec<Finding>)> = Vec::new();
        for finding in findings {
            let citations: BTreeSet<FactId> = finding.citations.iter().cloned().collect();
            let slot = clusters
                .iter()
                .position(|(union, _)| jaccard(&citations, union) >= self.similarity_threshold);
            match slot {
                Some(idx) => {
                    let (union, members) = &mut clusters[idx];
                    union.extend(citations);
                    members.push(finding);
                }
                None => clusters.push((citations, vec![finding])),
            }
        }

        clusters
            .into_iter()
            .map(|(_, members)| merge_cluster(members))
            .collect()
    }
}

fn jaccard(a: &BTreeSet<FactId>, b: &BTreeSet<FactId>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count() as f64;
    let union = a.union(b).count() as f64;
    intersection / union
}

fn merge_cluster(mut members: Vec<Finding>) -> Finding {
    if members.len() == 1 {
        return members.pop().unwrap();
    }
    members.sort_by(|a, b| a.id.cmp(&b.id));

    let canonical = members[0].clone();

    let citations: Vec<FactId> = members
        .iter()
        .flat_map(|f| f.citations.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let overlap_id = members.iter().filter_map(|f| f.overlap_id.clone()).min();

    let description = members
        .iter()
        .map(|f| f.description.as_str())
        .max_by(|a, b| a.len().cmp(&b.len()).then(b.cmp(a)))
        .unwrap_or_default()
        .to_string();

    let kind = merge_kinds(&canonical.kind, &members);

    let integration_related =
        members.iter().any(|f| f.integration_related) || overlap_id.is_some();

    let target_action = members.iter().find_map(|f| f.target_action.clone());
    let integration_option = members.iter().find_map(|f| f.integration_option.clone());

    let merged_from = members
        .iter()
        .flat_map(|f| {
            f.merged_from
                .iter()
                .cloned()
                .chain(std::iter::once(f.id.clone()))
        })
        .filter(|id| *id != canonical.id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    Finding {
        id: canonical.id,
        domain: canonical.domain,
        kind,
        description,
        citations,
        overlap_id,
        integration_related,
        target_action,
        integration_option,
        merged_from,
    }
}

/// Merges variant payloads across a cluster. All members share the
/// canonical variant tag because buckets are keyed by it.
fn merge_kinds(canonical: &FindingKind, members: &[Finding]) -> FindingKind {
    match canonical {
        FindingKind::Risk { .. } => FindingKind::Risk {
            severity: members
                .iter()
                .filter_map(|f| match &f.kind {
                    FindingKind::Risk { severity } => Some(*severity),
                    _ => None,
                })
                .max()
                .expect("risk cluster has at least one risk"),
        },
        FindingKind::WorkItem {
            cost_category: canonical_category,
            ..
        } => {
            let mut phase = None;
            let mut base_cost = 0.0f64;
            for member in members {
                if let FindingKind::WorkItem {
                    phase: p,
                    base_cost: c,
                    ..
                } = &member.kind
                {
                    phase = Some(phase.map_or(*p, |prev: crate::model::WorkPhase| prev.min(*p)));
                    base_cost = base_cost.max(*c);
                }
            }
            FindingKind::WorkItem {
                phase: phase.expect("work item cluster has at least one work item"),
                cost_category: *canonical_category,
                base_cost,
            }
        }
        FindingKind::Recommendation { .. } => FindingKind::Recommendation {
            priority: members
                .iter()
                .filter_map(|f| match &f.kind {
                    FindingKind::Recommendation { priority } => Some(*priority),
                    _ => None,
                })
                .max()
                .expect("recommendation cluster has at least one recommendation"),
        },
        FindingKind::StrategicConsideration { .. } => FindingKind::StrategicConsideration {
            priority: members
                .iter()
                .filter_map(|f| match &f.kind {
                    FindingKind::StrategicConsideration { priority } => Some(*priority),
                    _ => None,
                })
                .max()
                .expect("strategic cluster has at least one strategic consideration"),
        },
    }
}
