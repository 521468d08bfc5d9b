//! Per-domain completion status and the run report.
//!
//! A run that completes with some domains degraded must expose exactly
//! which of the six produced output, not a single aggregate flag.

use super::context::RunId;
use crate::cost::{CostEstimate, DealType, TsaEstimate};
use crate::model::{Domain, Finding, OverlapCandidate};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of one stage (overlap detection or reasoning) for one domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageStatus {
    Completed { produced: usize },
    Failed { error: String },
}

impl StageStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, StageStatus::Completed { .. })
    }
}

/// Completion status of one domain within a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainStatus {
    pub overlap: StageStatus,
    pub reasoning: StageStatus,
    /// Candidate findings rejected by the citation-integrity gate.
    pub rejected_findings: u32,
    /// Overlap pairs rejected for citing unknown facts.
    pub rejected_pairs: u32,
}

impl DomainStatus {
    pub fn is_fully_completed(&self) -> bool {
        self.overlap.is_completed() && self.reasoning.is_completed()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    /// The run was cancelled before all stages finished; findings, overlaps
    /// and cost figures are intentionally absent rather than partial.
    Cancelled,
}

/// Complete result of one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub deal_type: DealType,
    pub status: RunStatus,
    pub domains: BTreeMap<Domain, DomainStatus>,
    pub overlaps: BTreeMap<Domain, Vec<OverlapCandidate>>,
    /// Consolidated cross-domain findings.
    pub findings: Vec<Finding>,
    pub cost_estimates: Vec<CostEstimate>,
    pub tsa: Option<TsaEstimate>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn degraded_domains(&self) -> Vec<Domain> {
        self.domains
            .iter()
            .filter(|(_, status)| !status.is_fully_completed())
            .map(|(domain, _)| *domain)
            .collect()
    }
}
