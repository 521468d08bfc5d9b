//! mergescope - AI-powered technology due-diligence engine for M&A
//!
//! This library ingests extracted facts about a target company's (and
//! optionally a buyer's) IT estate, detects overlaps between the two
//! estates, synthesizes cited findings and prices the resulting work under
//! the deal's legal structure.
//!
//! # Core Concepts
//!
//! - **Facts**: atomic, immutable claims about one entity's IT estate,
//!   tagged by entity (target/buyer) and analytical domain
//! - **Overlaps**: classified relationships between a target capability and
//!   a buyer capability within one domain
//! - **Findings**: cited risks, work items, recommendations and strategic
//!   considerations; every finding is traceable to specific source facts
//! - **Deal-type-aware costing**: acquisition, carve-out and divestiture
//!   multipliers plus a bounded transitional-service model
//!
//! # Example Usage
//!
//! ```ignore
//! use mergescope::{MergescopeConfig, PipelineController, RunInput};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = MergescopeConfig::from_env()?;
//! let llm = config.create_client();
//! let controller = PipelineController::new(config, llm);
//!
//! let input: RunInput = serde_json::from_str(&std::fs::read_to_string("facts.json")?)?;
//! let report = controller.run(input).await?;
//!
//! for domain in report.degraded_domains() {
//!     eprintln!("domain {} degraded", domain);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`model`]: facts, gaps, overlaps, findings, inventory
//! - [`llm`]: reasoning-capability client abstraction
//! - [`overlap`]: overlap detection engine
//! - [`reasoning`]: finding synthesis with the citation validation gate
//! - [`consolidation`]: cross-domain finding deduplication
//! - [`cost`]: deal-type multipliers and transitional-service estimation
//! - [`pipeline`]: run orchestration with per-domain isolation
//! - [`export`]: persisted-artifact schemas

pub mod cli;
pub mod config;
pub mod consolidation;
pub mod cost;
pub mod export;
pub mod llm;
pub mod model;
pub mod overlap;
pub mod pipeline;
pub mod reasoning;
pub mod util;

// Re-export key types for convenient access
pub use config::{ConfigError, MergescopeConfig};
pub use consolidation::ConsolidationEngine;
pub use cost::{CostError, CostEstimate, CostModel, DealType, TsaConfig, TsaEstimate};
pub use llm::{BackendError, GenAiClient, LlmClient, MockLlmClient};
pub use model::{
    Domain, Entity, Fact, FactId, Finding, FindingId, FindingKind, Gap, InventorySummary,
    OverlapCandidate, OverlapClass, OverlapId,
};
pub use overlap::{OverlapEngine, OverlapSet};
pub use pipeline::{DomainStatus, PipelineController, RunId, RunInput, RunReport, RunStatus};
pub use reasoning::{DomainFindings, ReasoningOrchestrator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
