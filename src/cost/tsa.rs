//! Transitional-service (TSA) cost estimation.
//!
//! Only a carve-out incurs TSA cost: the target keeps depending on the
//! parent's shared systems for a transition period. The monthly figure is
//! rate-per-shared-application plus rate-per-shared-infrastructure, clamped
//! between a floor and a ceiling, then multiplied by the duration.

use super::model::DealType;
use crate::model::{Domain, InventorySummary, OverlapCandidate};
use serde::{Deserialize, Serialize};

/// Rates and bounds for the TSA calculation, in the deal currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TsaConfig {
    pub app_rate_monthly: f64,
    pub infra_rate_monthly: f64,
    pub floor_monthly: f64,
    pub ceiling_monthly: f64,
}

impl Default for TsaConfig {
    fn default() -> Self {
        Self {
            app_rate_monthly: 2_500.0,
            infra_rate_monthly: 7_500.0,
            floor_monthly: 10_000.0,
            ceiling_monthly: 150_000.0,
        }
    }
}

impl TsaConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.app_rate_monthly <= 0.0 || self.infra_rate_monthly <= 0.0 {
            return Err("TSA rates must be positive".to_string());
        }
        if self.floor_monthly > self.ceiling_monthly {
            return Err(format!(
                "TSA floor {} exceeds ceiling {}",
                self.floor_monthly, self.ceiling_monthly
            ));
        }
        Ok(())
    }
}

/// Derived transitional-service estimate. Recomputed on demand, never a
/// source of truth independent of its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TsaEstimate {
    pub deal_type: DealType,
    pub shared_applications: usize,
    pub shared_infrastructure: usize,
    pub monthly_cost: f64,
    /// True when the raw monthly figure was clamped to the floor or ceiling.
    pub clamped: bool,
    pub duration_months: u32,
    pub total_cost: f64,
}

impl TsaEstimate {
    fn zero(deal_type: DealType, duration_months: u32) -> Self {
        Self {
            deal_type,
            shared_applications: 0,
            shared_infrastructure: 0,
            monthly_cost: 0.0,
            clamped: false,
            duration_months,
            total_cost: 0.0,
        }
    }
}

pub(crate) fn estimate(
    config: &TsaConfig,
    deal_type: DealType,
    inventory: &InventorySummary,
    overlaps: &[OverlapCandidate],
    duration_months: u32,
) -> TsaEstimate {
    if deal_type != DealType::Carveout {
        return TsaEstimate::zero(deal_type, duration_months);
    }

    let shared_applications = inventory.shared_application_count()
        + count_shared_overlaps(overlaps, Domain::Applications);
    let shared_infrastructure = inventory.shared_infrastructure_count()
        + count_shared_overlaps(overlaps, Domain::Infrastructure);

    let raw_monthly = shared_applications as f64 * config.app_rate_monthly
        + shared_infrastructure as f64 * config.infra_rate_monthly;
    let monthly_cost = raw_monthly.clamp(config.floor_monthly, config.ceiling_monthly);

    TsaEstimate {
        deal_type,
        shared_applications,
        shared_infrastructure,
        monthly_cost,
        clamped: monthly_cost != raw_monthly,
        duration_months,
        total_cost: monthly_cost * f64::from(duration_months),
    }
}

/// Overlaps classified platform_alignment or capability_overlap represent
/// systems the two estates currently share or duplicate; they widen the
/// transitional-service scope beyond the inventory summary.
fn count_shared_overlaps(overlaps: &[OverlapCandidate], domain: Domain) -> usize {
    overlaps
        .iter()
        .filter(|o| o.domain == domain && o.classification.is_shared_system())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Entity, FactId, InventoryCategory, InventoryItem, OverlapClass, OverlapId,
    };

    fn inventory(shared_apps: usize, shared_infra: usize) -> InventorySummary {
        let mut items = Vec::new();
        for i in 0..shared_apps {
            items.push(InventoryItem {
                name: format!("app-{}", i),
                category: InventoryCategory::Application,
                annual_cost: None,
                shared: true,
            });
        }
        for i in 0..shared_infra {
            items.push(InventoryItem {
                name: format!("infra-{}", i),
                category: InventoryCategory::Infrastructure,
                annual_cost: None,
                shared: true,
            });
        }
        InventorySummary::new(items)
    }

    fn shared_overlap(domain: Domain, seq: u32, classification: OverlapClass) -> OverlapCandidate {
        OverlapCandidate {
            id: OverlapId::new(domain, seq),
            domain,
            classification,
            target_fact: Some(FactId::new(Entity::Target, domain, seq)),
            buyer_fact: Some(FactId::new(Entity::Buyer, domain, seq)),
            rationale: String::new(),
        }
    }

    #[test]
    fn test_acquisition_and_divestiture_are_zero() {
        let config = TsaConfig::default();
        let inv = inventory(10, 10);

        for deal in [DealType::Acquisition, DealType::Divestiture] {
            let tsa = estimate(&config, deal, &inv, &[], 18);
            assert_eq!(tsa.monthly_cost, 0.0);
            assert_eq!(tsa.total_cost, 0.0);
            assert!(!tsa.clamped);
        }
    }

    #[test]
    fn test_carveout_in_band_is_unclamped() {
        let config = TsaConfig::default();
        // 4 apps * 2500 + 2 infra * 7500 = 25_000/month
        let tsa = estimate(&config, DealType::Carveout, &inventory(4, 2), &[], 12);

        assert_eq!(tsa.monthly_cost, 25_000.0);
        assert!(!tsa.clamped);
        assert_eq!(tsa.total_cost, 300_000.0);
    }

    #[test]
    fn test_ceiling_clamp_regardless_of_item_count() {
        let config = TsaConfig::default();
        let tsa = estimate(&config, DealType::Carveout, &inventory(500, 500), &[], 6);

        assert_eq!(tsa.monthly_cost, config.ceiling_monthly);
        assert!(tsa.clamped);
        assert_eq!(tsa.total_cost, config.ceiling_monthly * 6.0);
    }

    #[test]
    fn test_floor_clamp_with_no_shared_items() {
        let config = TsaConfig::default();
        let tsa = estimate(&config, DealType::Carveout, &InventorySummary::default(), &[], 12);

        assert_eq!(tsa.monthly_cost, config.floor_monthly);
        assert!(tsa.clamped);
    }

    #[test]
    fn test_shared_overlaps_widen_scope() {
        let config = TsaConfig::default();
        let overlaps = vec![
            shared_overlap(Domain::Applications, 1, OverlapClass::CapabilityOverlap),
            shared_overlap(Domain::Applications, 2, OverlapClass::PlatformAlignment),
            // Mismatches and gaps are not shared systems.
            shared_overlap(Domain::Applications, 3, OverlapClass::PlatformMismatch),
            shared_overlap(Domain::Infrastructure, 1, OverlapClass::PlatformAlignment),
            // Wrong domain for infrastructure scope.
            shared_overlap(Domain::Cybersecurity, 1, OverlapClass::PlatformAlignment),
        ];

        let tsa = estimate(&config, DealType::Carveout, &inventory(1, 0), &overlaps, 1);
        assert_eq!(tsa.shared_applications, 3);
        assert_eq!(tsa.shared_infrastructure, 1);
        // 3 * 2500 + 1 * 7500 = 15_000
        assert_eq!(tsa.monthly_cost, 15_000.0);
    }

    #[test]
    fn test_zero_duration() {
        let config = TsaConfig::default();
        let tsa = estimate(&config, DealType::Carveout, &inventory(4, 2), &[], 0);
        assert_eq!(tsa.total_cost, 0.0);
        assert_eq!(tsa.monthly_cost, 25_000.0);
    }

    #[test]
    fn test_config_validation() {
        let mut config = TsaConfig::default();
        assert!(config.validate().is_ok());

        config.floor_monthly = 200_000.0;
        assert!(config.validate().is_err());

        let negative = TsaConfig {
            app_rate_monthly: -1.0,
            ..TsaConfig::default()
        };
        assert!(negative.validate().is_err());
    }
}
