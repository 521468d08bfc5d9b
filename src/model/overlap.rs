//! Overlap candidates: detected relationships between target and buyer capabilities.

use super::fact::{Domain, FactId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a target/buyer capability pairing.
///
/// Exactly one label applies to every candidate; there is no
/// "unclassified" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapClass {
    /// Both entities use the same or a compatible capability.
    PlatformAlignment,
    /// Incompatible competing capability.
    PlatformMismatch,
    /// One entity lacks a capability the other has.
    CapabilityGap,
    /// Redundant duplicate capability.
    CapabilityOverlap,
}

impl OverlapClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlapClass::PlatformAlignment => "platform_alignment",
            OverlapClass::PlatformMismatch => "platform_mismatch",
            OverlapClass::CapabilityGap => "capability_gap",
            OverlapClass::CapabilityOverlap => "capability_overlap",
        }
    }

    /// True for classes that represent systems both entities currently
    /// share or duplicate; these feed the transitional-service scope.
    pub fn is_shared_system(&self) -> bool {
        matches!(
            self,
            OverlapClass::PlatformAlignment | OverlapClass::CapabilityOverlap
        )
    }
}

impl fmt::Display for OverlapClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain-scoped sequential overlap identifier, e.g. `overlap-network-003`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlapId(pub String);

impl OverlapId {
    pub fn new(domain: Domain, seq: u32) -> Self {
        OverlapId(format!("overlap-{}-{:03}", domain, seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OverlapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A pairing of one target fact and one buyer fact (or explicitly "no
/// counterpart") within a single domain.
///
/// Invariant: at least one of `target_fact` / `buyer_fact` is set, and
/// every referenced id resolves to a real fact of the matching entity.
/// The engine enforces this before a candidate is emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapCandidate {
    pub id: OverlapId,
    pub domain: Domain,
    pub classification: OverlapClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_fact: Option<FactId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_fact: Option<FactId>,
    pub rationale: String,
}

impl OverlapCandidate {
    /// Cited fact ids, target side first.
    pub fn cited_facts(&self) -> impl Iterator<Item = &FactId> {
        self.target_fact.iter().chain(self.buyer_fact.iter())
    }

    pub fn references_fact(&self, id: &FactId) -> bool {
        self.cited_facts().any(|f| f == id)
    }
}
