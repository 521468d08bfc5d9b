//! Persisted-artifact schemas.
//!
//! The persistence technology is a collaborator's concern; these structs
//! are the contract. Downstream reporting depends on every finding record
//! carrying populated citation fields, so the findings export re-checks
//! that guarantee before it is written.

use crate::cost::{CostEstimate, DealType, TsaEstimate};
use crate::model::{
    Domain, Fact, Finding, FindingKind, Gap, OverlapCandidate,
};
use crate::pipeline::{RunId, RunReport};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct FactsExport {
    pub run_id: RunId,
    pub generated_at: DateTime<Utc>,
    pub facts: Vec<Fact>,
    pub gaps: Vec<Gap>,
}

impl FactsExport {
    pub fn new(run_id: RunId, facts: Vec<Fact>, gaps: Vec<Gap>) -> Self {
        Self {
            run_id,
            generated_at: Utc::now(),
            facts,
            gaps,
        }
    }
}

/// Overlap candidates keyed by domain.
#[derive(Debug, Clone, Serialize)]
pub struct OverlapsExport {
    pub run_id: RunId,
    pub generated_at: DateTime<Utc>,
    pub domains: BTreeMap<Domain, Vec<OverlapCandidate>>,
}

impl OverlapsExport {
    pub fn from_report(report: &RunReport) -> Self {
        Self {
            run_id: report.run_id,
            generated_at: Utc::now(),
            domains: report.overlaps.clone(),
        }
    }
}

/// Findings partitioned by variant, as downstream reporting consumes them.
#[derive(Debug, Clone, Serialize)]
pub struct FindingsExport {
    pub run_id: RunId,
    pub generated_at: DateTime<Utc>,
    pub risks: Vec<Finding>,
    pub work_items: Vec<Finding>,
    pub recommendations: Vec<Finding>,
    pub strategic_considerations: Vec<Finding>,
}

impl FindingsExport {
    pub fn from_report(report: &RunReport) -> Result<Self> {
        Self::from_findings(report.run_id, &report.findings)
    }

    pub fn from_findings(run_id: RunId, findings: &[Finding]) -> Result<Self> {
        let mut export = Self {
            run_id,
            generated_at: Utc::now(),
            risks: Vec::new(),
            work_items: Vec::new(),
            recommendations: Vec::new(),
            strategic_considerations: Vec::new(),
        };

        for finding in findings {
            finding
                .check_invariants()
                .map_err(|e| anyhow::anyhow!(e))
                .context("finding violates export contract")?;
            match finding.kind {
                FindingKind::Risk { .. } => export.risks.push(finding.clone()),
                FindingKind::WorkItem { .. } => export.work_items.push(finding.clone()),
                FindingKind::Recommendation { .. } => {
                    export.recommendations.push(finding.clone())
                }
                FindingKind::StrategicConsideration { .. } => {
                    export.strategic_considerations.push(finding.clone())
                }
            }
        }
        Ok(export)
    }

    pub fn len(&self) -> usize {
        self.risks.len()
            + self.work_items.len()
            + self.recommendations.len()
            + self.strategic_considerations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cost output keyed by run and work item.
#[derive(Debug, Clone, Serialize)]
pub struct CostExport {
    pub run_id: RunId,
    pub deal_type: DealType,
    pub generated_at: DateTime<Utc>,
    pub estimates: Vec<CostEstimate>,
    pub tsa: Option<TsaEstimate>,
}

impl CostExport {
    pub fn from_report(report: &RunReport) -> Self {
        Self {
            run_id: report.run_id,
            deal_type: report.deal_type,
            generated_at: Utc::now(),
            estimates: report.cost_estimates.clone(),
            tsa: report.tsa.clone(),
        }
    }
}

/// Writes any export as pretty JSON.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating export file {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("serializing export to {}", path.display()))?;
    Ok(())
}
