//! Pipeline Controller: sequences one analysis run.
//!
//! The six domains are independent units of work and run as concurrent
//! tasks; one domain's failure never suppresses another's output (a
//! historical defect in an earlier system made exactly that mistake).
//! Consolidation and costing wait for every domain to reach a terminal
//! state because they operate on the full cross-domain finding set.

use super::context::{RunId, RunInput};
use super::status::{DomainStatus, RunReport, RunStatus, StageStatus};
use crate::config::MergescopeConfig;
use crate::consolidation::ConsolidationEngine;
use crate::cost::CostModel;
use crate::llm::LlmClient;
use crate::model::{Domain, Fact, Finding, Gap, OverlapCandidate};
use crate::overlap::OverlapEngine;
use crate::reasoning::ReasoningOrchestrator;
use anyhow::{Context, Result};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{info, warn};

pub struct PipelineController {
    llm: Arc<dyn LlmClient>,
    config: MergescopeConfig,
}

struct DomainOutcome {
    domain: Domain,
    status: DomainStatus,
    overlaps: Vec<OverlapCandidate>,
    findings: Vec<Finding>,
    cancelled: bool,
}

impl PipelineController {
    pub fn new(config: MergescopeConfig, llm: Arc<dyn LlmClient>) -> Self {
        Self { llm, config }
    }

    /// Runs a full analysis to completion.
    pub async fn run(&self, input: RunInput) -> Result<RunReport> {
        let (_tx, rx) = watch::channel(false);
        self.run_cancellable(input, rx).await
    }

    /// Runs a full analysis; flipping the watch channel to `true` cancels
    /// the run at the next stage boundary. A cancelled run yields a report
    /// marked [`RunStatus::Cancelled`] with no partial findings or cost
    /// figures, never a mixed state.
    pub async fn run_cancellable(
        &self,
        input: RunInput,
        cancel: watch::Receiver<bool>,
    ) -> Result<RunReport> {
        let run_id = RunId::new();
        let started_at = Utc::now();
        info!(run = %run_id, deal_type = %input.deal_type, facts = input.facts.len(), "starting analysis run");

        let mut set = JoinSet::new();
        for domain in Domain::ALL {
            let (target_facts, buyer_facts) = input.facts_for(domain);
            let gaps = input.gaps_for(domain);
            let llm = Arc::clone(&self.llm);
            let config = self.config.clone();
            let cancel = cancel.clone();

            set.spawn(async move {
                run_domain(llm, config, domain, target_facts, buyer_facts, gaps, cancel).await
            });
        }

        let mut domains = BTreeMap::new();
        let mut overlaps = BTreeMap::new();
        let mut findings = Vec::new();
        let mut cancelled = false;

        while let Some(joined) = set.join_next().await {
            let outcome = joined.context("domain task panicked")?;
            cancelled |= outcome.cancelled;
            domains.insert(outcome.domain, outcome.status);
            overlaps.insert(outcome.domain, outcome.overlaps);
            findings.extend(outcome.findings);
        }

        if cancelled || *cancel.borrow() {
            warn!(run = %run_id, "analysis run cancelled; discarding partial findings");
            return Ok(RunReport {
                run_id,
                deal_type: input.deal_type,
                status: RunStatus::Cancelled,
                domains,
                overlaps: BTreeMap::new(),
                findings: Vec::new(),
                cost_estimates: Vec::new(),
                tsa: None,
                started_at,
                finished_at: Utc::now(),
            });
        }

        // All domains are terminal; cross-domain stages may now run.
        let consolidation = ConsolidationEngine::new(self.config.similarity_threshold);
        let findings = consolidation.consolidate(findings);

        let cost_model = CostModel::new(self.config.tsa.clone());
        let cost_estimates = cost_model
            .estimate_all(&findings, input.deal_type)
            .context("pricing work items")?;
        let all_overlaps: Vec<OverlapCandidate> =
            overlaps.values().flatten().cloned().collect();
        let tsa = cost_model.tsa_estimate(
            input.deal_type,
            &input.inventory,
            &all_overlaps,
            input.tsa_months,
        );

        let report = RunReport {
            run_id,
            deal_type: input.deal_type,
            status: RunStatus::Completed,
            domains,
            overlaps,
            findings,
            cost_estimates,
            tsa: Some(tsa),
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            run = %run_id,
            findings = report.findings.len(),
            degraded = report.degraded_domains().len(),
            "analysis run complete"
        );
        Ok(report)
    }
}

async fn run_domain(
    llm: Arc<dyn LlmClient>,
    config: MergescopeConfig,
    domain: Domain,
    target_facts: Vec<Fact>,
    buyer_facts: Vec<Fact>,
    gaps: Vec<Gap>,
    cancel: watch::Receiver<bool>,
) -> DomainOutcome {
    let cancelled_outcome = |overlap, reasoning| DomainOutcome {
        domain,
        status: DomainStatus {
            overlap,
            reasoning,
            rejected_findings: 0,
            rejected_pairs: 0,
        },
        overlaps: Vec::new(),
        findings: Vec::new(),
        cancelled: true,
    };

    if *cancel.borrow() {
        let skipped = StageStatus::Failed {
            error: "cancelled".to_string(),
        };
        return cancelled_outcome(skipped.clone(), skipped);
    }

    let overlap_engine = OverlapEngine::new(Arc::clone(&llm), config.vendor_match_threshold);
    let (overlap_status, overlaps, rejected_pairs) = match overlap_engine
        .detect(domain, &target_facts, &buyer_facts)
        .await
    {
        Ok(set) => (
            StageStatus::Completed {
                produced: set.candidates.len(),
            },
            set.candidates,
            set.rejected_pairs,
        ),
        Err(e) => {
            warn!(domain = %domain, stage = "overlap", error = %e, "domain stage degraded to empty result");
            (
                StageStatus::Failed {
                    error: e.to_string(),
                },
                Vec::new(),
                0,
            )
        }
    };

    if *cancel.borrow() {
        return cancelled_outcome(
            overlap_status,
            StageStatus::Failed {
                error: "cancelled".to_string(),
            },
        );
    }

    let mut all_facts = target_facts;
    all_facts.extend(buyer_facts);

    let orchestrator = ReasoningOrchestrator::new(llm);
    let (reasoning_status, findings, rejected_findings) = match orchestrator
        .analyze(domain, &all_facts, &gaps, &overlaps)
        .await
    {
        Ok(result) => (
            StageStatus::Completed {
                produced: result.findings.len(),
            },
            result.findings,
            result.rejected,
        ),
        Err(e) => {
            warn!(domain = %domain, stage = "reasoning", error = %e, "domain stage degraded to empty result");
            (
                StageStatus::Failed {
                    error: e.to_string(),
                },
                Vec::new(),
                0,
            )
        }
    };

    DomainOutcome {
        domain,
        status: DomainStatus {
            overlap: overlap_status,
            reasoning: reasoning_status,
            rejected_findings,
            rejected_pairs,
        },
        overlaps,
        findings,
        cancelled: false,
    }
}
