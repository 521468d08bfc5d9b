//! Cross-domain finding consolidation.

mod engine;

pub use engine::ConsolidationEngine;
