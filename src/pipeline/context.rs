//! Run-scoped input and identity.

use crate::cost::DealType;
use crate::model::{Domain, Entity, Fact, Gap, InventorySummary};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier isolating one analysis run's state from every other run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        RunId(Uuid::new_v4())
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Everything a run consumes, assembled from the extraction and inventory
/// collaborators. Append-only from the engine's point of view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInput {
    pub facts: Vec<Fact>,
    #[serde(default)]
    pub gaps: Vec<Gap>,
    #[serde(default)]
    pub inventory: InventorySummary,
    pub deal_type: DealType,
    /// Assumed transitional-service duration.
    #[serde(default = "default_tsa_months")]
    pub tsa_months: u32,
}

fn default_tsa_months() -> u32 {
    12
}

impl Default for RunInput {
    fn default() -> Self {
        Self {
            facts: Vec::new(),
            gaps: Vec::new(),
            inventory: InventorySummary::default(),
            deal_type: DealType::Acquisition,
            tsa_months: default_tsa_months(),
        }
    }
}

impl RunInput {
    /// Facts for one domain, partitioned by entity.
    pub fn facts_for(&self, domain: Domain) -> (Vec<Fact>, Vec<Fact>) {
        let mut target = Vec::new();
        let mut buyer = Vec::new();
        for fact in self.facts.iter().filter(|f| f.domain == domain) {
            match fact.entity {
                Entity::Target => target.push(fact.clone()),
                Entity::Buyer => buyer.push(fact.clone()),
            }
        }
        (target, buyer)
    }

    pub fn gaps_for(&self, domain: Domain) -> Vec<Gap> {
        self.gaps
            .iter()
            .filter(|g| g.domain == domain)
            .cloned()
            .collect()
    }
}
