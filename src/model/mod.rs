//! Core data model: facts, gaps, overlaps, findings, inventory.
//!
//! Everything in this module is an immutable record. Facts and gaps arrive
//! from the extraction collaborator and are never mutated afterwards;
//! overlaps and findings are produced once per analysis run and only ever
//! merged into new records, never edited in place.

mod fact;
mod finding;
mod inventory;
mod overlap;

pub use fact::{Criticality, Domain, Entity, Fact, FactAttributes, FactId, Gap, GapId, Provenance};
pub use finding::{
    Finding, FindingId, FindingKind, Priority, Severity, WorkPhase, KIND_RECOMMENDATION,
    KIND_RISK, KIND_STRATEGIC, KIND_WORK_ITEM,
};
pub use inventory::{InventoryCategory, InventoryItem, InventorySummary};
pub use overlap::{OverlapCandidate, OverlapClass, OverlapId};
