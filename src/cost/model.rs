//! Work-item pricing under the three deal structures.
//!
//! Multipliers live in a fixed table keyed by (deal type, category).
//! Acquisition is always 1.0; carve-out and divestiture sit in [1.5, 3.0]
//! with carve-out never exceeding divestiture for a category, since a clean
//! sale requires more extraction work than a retained-parent carve-out.
//! A missing table entry is a hard error: silently defaulting would corrupt
//! financial output.

use super::tsa::{self, TsaConfig, TsaEstimate};
use crate::model::{
    Domain, Finding, FindingId, FindingKind, InventorySummary, OverlapCandidate,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Legal structure of the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealType {
    Acquisition,
    Carveout,
    Divestiture,
}

impl DealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DealType::Acquisition => "acquisition",
            DealType::Carveout => "carveout",
            DealType::Divestiture => "divestiture",
        }
    }
}

impl fmt::Display for DealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DealType {
    type Err = CostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "acquisition" => Ok(DealType::Acquisition),
            "carveout" | "carve-out" | "carve_out" => Ok(DealType::Carveout),
            "divestiture" => Ok(DealType::Divestiture),
            other => Err(CostError::UnknownDealType(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum CostError {
    #[error("unknown deal type: {0} (expected acquisition, carveout, or divestiture)")]
    UnknownDealType(String),

    #[error("no multiplier configured for deal type {deal_type}, category {category}")]
    MissingMultiplier { deal_type: DealType, category: Domain },

    #[error("finding {0} is not a work item and cannot be priced")]
    NotAWorkItem(FindingId),
}

/// Priced work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub work_item: FindingId,
    pub category: Domain,
    pub deal_type: DealType,
    pub base_cost: f64,
    pub multiplier: f64,
    pub adjusted_cost: f64,
    pub assumptions: String,
}

pub struct CostModel {
    multipliers: HashMap<(DealType, Domain), f64>,
    tsa: TsaConfig,
}

impl CostModel {
    pub fn new(tsa: TsaConfig) -> Self {
        let mut multipliers = HashMap::new();

        for domain in Domain::ALL {
            multipliers.insert((DealType::Acquisition, domain), 1.0);
        }

        // (category, carve-out, divestiture)
        let adjusted = [
            (Domain::Infrastructure, 2.0, 2.5),
            (Domain::Applications, 1.8, 2.2),
            (Domain::Organization, 1.5, 1.8),
            (Domain::Cybersecurity, 1.9, 2.4),
            (Domain::Network, 2.2, 2.8),
            (Domain::IdentityAccess, 2.5, 3.0),
        ];
        for (domain, carveout, divestiture) in adjusted {
            multipliers.insert((DealType::Carveout, domain), carveout);
            multipliers.insert((DealType::Divestiture, domain), divestiture);
        }

        Self { multipliers, tsa }
    }

    pub fn multiplier(&self, deal_type: DealType, category: Domain) -> Result<f64, CostError> {
        self.multipliers
            .get(&(deal_type, category))
            .copied()
            .ok_or(CostError::MissingMultiplier {
                deal_type,
                category,
            })
    }

    /// Prices one work-item finding under the given deal structure.
    pub fn estimate(&self, finding: &Finding, deal_type: DealType) -> Result<CostEstimate, CostError> {
        let (category, base_cost) = match &finding.kind {
            FindingKind::WorkItem {
                cost_category,
                base_cost,
                ..
            } => (*cost_category, *base_cost),
            _ => return Err(CostError::NotAWorkItem(finding.id.clone())),
        };

        let multiplier = self.multiplier(deal_type, category)?;
        let adjusted_cost = base_cost * multiplier;

        Ok(CostEstimate {
            work_item: finding.id.clone(),
            category,
            deal_type,
            base_cost,
            multiplier,
            adjusted_cost,
            assumptions: format!(
                "base cost {:.0} at {}x {} multiplier for {} work",
                base_cost, multiplier, deal_type, category
            ),
        })
    }

    /// Prices every work item in a finding set; other variants are skipped.
    pub fn estimate_all(
        &self,
        findings: &[Finding],
        deal_type: DealType,
    ) -> Result<Vec<CostEstimate>, CostError> {
        findings
            .iter()
            .filter(|f| matches!(f.kind, FindingKind::WorkItem { .. }))
            .map(|f| self.estimate(f, deal_type))
            .collect()
    }

    /// Transitional-service estimate; zero for anything but a carve-out.
    pub fn tsa_estimate(
        &self,
        deal_type: DealType,
        inventory: &InventorySummary,
        overlaps: &[OverlapCandidate],
        duration_months: u32,
    ) -> TsaEstimate {
        tsa::estimate(&self.tsa, deal_type, inventory, overlaps, duration_months)
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self::new(TsaConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Entity, FactId, WorkPhase, KIND_WORK_ITEM};
    use yare::parameterized;

    fn work_item(category: Domain, base_cost: f64) -> Finding {
        Finding {
            id: FindingId::new(KIND_WORK_ITEM, category, 1),
            domain: category,
            kind: FindingKind::WorkItem {
                phase: WorkPhase::Day100,
                cost_category: category,
                base_cost,
            },
            description: "separation work".to_string(),
            citations: vec![FactId::new(Entity::Target, category, 1)],
            overlap_id: None,
            integration_related: false,
            target_action: None,
            integration_option: None,
            merged_from: Vec::new(),
        }
    }

    #[parameterized(
        infrastructure = { Domain::Infrastructure },
        applications = { Domain::Applications },
        organization = { Domain::Organization },
        cybersecurity = { Domain::Cybersecurity },
        network = { Domain::Network },
        identity_access = { Domain::IdentityAccess },
    )]
    fn acquisition_is_identity(category: Domain) {
        let model = CostModel::default();
        let estimate = model
            .estimate(&work_item(category, 83_000.0), DealType::Acquisition)
            .unwrap();
        assert_eq!(estimate.multiplier, 1.0);
        assert_eq!(estimate.adjusted_cost, 83_000.0);
    }

    #[parameterized(
        infrastructure = { Domain::Infrastructure },
        applications = { Domain::Applications },
        organization = { Domain::Organization },
        cybersecurity = { Domain::Cybersecurity },
        network = { Domain::Network },
        identity_access = { Domain::IdentityAccess },
    )]
    fn carveout_not_above_divestiture(category: Domain) {
        let model = CostModel::default();
        let carveout = model.multiplier(DealType::Carveout, category).unwrap();
        let divestiture = model.multiplier(DealType::Divestiture, category).unwrap();
        assert!(carveout <= divestiture);
        assert!((1.5..=3.0).contains(&carveout));
        assert!((1.5..=3.0).contains(&divestiture));
    }

    #[test]
    fn test_identity_pricing_strictly_increases_across_deal_types() {
        let model = CostModel::default();
        let item = work_item(Domain::IdentityAccess, 100_000.0);

        let acquisition = model.estimate(&item, DealType::Acquisition).unwrap();
        let carveout = model.estimate(&item, DealType::Carveout).unwrap();
        let divestiture = model.estimate(&item, DealType::Divestiture).unwrap();

        assert_eq!(acquisition.adjusted_cost, 100_000.0);
        assert!(acquisition.adjusted_cost < carveout.adjusted_cost);
        assert!(carveout.adjusted_cost < divestiture.adjusted_cost);
    }

    #[test]
    fn test_non_work_item_is_error() {
        let model = CostModel::default();
        let mut finding = work_item(Domain::Network, 1.0);
        finding.kind = FindingKind::Risk {
            severity: crate::model::Severity::High,
        };

        assert!(matches!(
            model.estimate(&finding, DealType::Acquisition),
            Err(CostError::NotAWorkItem(_))
        ));
    }

    #[test]
    fn test_unknown_deal_type_string_is_hard_error() {
        let parsed = "merger of equals".parse::<DealType>();
        assert!(matches!(parsed, Err(CostError::UnknownDealType(_))));
    }

    #[test]
    fn test_deal_type_accepts_hyphenated_carve_out() {
        assert_eq!("carve-out".parse::<DealType>().unwrap(), DealType::Carveout);
    }

    #[test]
    fn test_estimate_all_skips_non_work_items() {
        let model = CostModel::default();
        let mut risk = work_item(Domain::Network, 1.0);
        risk.kind = FindingKind::Risk {
            severity: crate::model::Severity::Low,
        };
        let findings = vec![risk, work_item(Domain::Network, 40_000.0)];

        let estimates = model.estimate_all(&findings, DealType::Carveout).unwrap();
        assert_eq!(estimates.len(), 1);
        assert_eq!(estimates[0].adjusted_cost, 40_000.0 * 2.2);
    }
}
