//! Cross-cutting properties of the public API: cost monotonicity,
//! consolidation idempotence, TSA bounds.

use mergescope::consolidation::ConsolidationEngine;
use mergescope::cost::{CostModel, DealType, TsaConfig};
use mergescope::model::{
    Domain, Entity, FactId, Finding, FindingId, FindingKind, InventoryCategory, InventoryItem,
    InventorySummary, Severity, WorkPhase, KIND_RISK, KIND_WORK_ITEM,
};

fn work_item(base_cost: f64) -> Finding {
    Finding {
        id: FindingId::new(KIND_WORK_ITEM, Domain::IdentityAccess, 1),
        domain: Domain::IdentityAccess,
        kind: FindingKind::WorkItem {
            phase: WorkPhase::Day100,
            cost_category: Domain::IdentityAccess,
            base_cost,
        },
        description: "consolidate identity providers".to_string(),
        citations: vec![FactId::new(Entity::Target, Domain::IdentityAccess, 1)],
        overlap_id: None,
        integration_related: false,
        target_action: None,
        integration_option: None,
        merged_from: Vec::new(),
    }
}

#[test]
fn test_identity_work_at_100k_prices_strictly_increasing() {
    let model = CostModel::default();
    let item = work_item(100_000.0);

    let mut costs = Vec::new();
    for deal in [DealType::Acquisition, DealType::Carveout, DealType::Divestiture] {
        costs.push(model.estimate(&item, deal).unwrap().adjusted_cost);
    }

    assert_eq!(costs[0], 100_000.0);
    assert!(costs[0] < costs[1]);
    assert!(costs[1] < costs[2]);
}

#[test]
fn test_acquisition_is_identity_for_every_category_and_base() {
    let model = CostModel::default();
    for category in Domain::ALL {
        for base in [0.0, 1.0, 99_999.5, 4_000_000.0] {
            let multiplier = model.multiplier(DealType::Acquisition, category).unwrap();
            assert_eq!(base * multiplier, base);
        }
    }
}

#[test]
fn test_tsa_is_bounded_for_any_inventory_size() {
    let config = TsaConfig::default();
    let model = CostModel::new(config.clone());

    for shared_count in [0usize, 1, 10, 1_000, 100_000] {
        let items: Vec<InventoryItem> = (0..shared_count)
            .map(|i| InventoryItem {
                name: format!("app-{}", i),
                category: InventoryCategory::Application,
                annual_cost: None,
                shared: true,
            })
            .collect();
        let inventory = InventorySummary::new(items);

        let tsa = model.tsa_estimate(DealType::Carveout, &inventory, &[], 12);
        assert!(tsa.monthly_cost >= config.floor_monthly);
        assert!(tsa.monthly_cost <= config.ceiling_monthly);

        for deal in [DealType::Acquisition, DealType::Divestiture] {
            let zero = model.tsa_estimate(deal, &inventory, &[], 12);
            assert_eq!(zero.monthly_cost, 0.0);
            assert_eq!(zero.total_cost, 0.0);
        }
    }
}

#[test]
fn test_consolidation_is_idempotent_over_a_mixed_set() {
    let cite = |seq: u32| FactId::new(Entity::Target, Domain::Applications, seq);
    let risk = |seq: u32, description: &str, citations: Vec<FactId>| Finding {
        id: FindingId::new(KIND_RISK, Domain::Applications, seq),
        domain: Domain::Applications,
        kind: FindingKind::Risk {
            severity: Severity::Medium,
        },
        description: description.to_string(),
        citations,
        overlap_id: None,
        integration_related: false,
        target_action: None,
        integration_option: None,
        merged_from: Vec::new(),
    };

    let findings = vec![
        risk(1, "ERP is end of life", vec![cite(1), cite(2)]),
        risk(2, "ERP platform out of vendor support", vec![cite(1), cite(2), cite(3)]),
        risk(3, "ERP support contract lapsing", vec![cite(2), cite(3)]),
        risk(4, "unrelated licensing exposure", vec![cite(9)]),
        work_item(100_000.0),
    ];

    let engine = ConsolidationEngine::new(0.5);
    let once = engine.consolidate(findings);
    let twice = engine.consolidate(once.clone());

    assert_eq!(once, twice);
    // The ERP cluster collapsed, the unrelated risk and the work item
    // survived untouched.
    assert!(once.len() < 5);
    assert!(once.iter().any(|f| f.description == "unrelated licensing exposure"));
    assert!(once
        .iter()
        .any(|f| matches!(f.kind, FindingKind::WorkItem { .. })));
}
