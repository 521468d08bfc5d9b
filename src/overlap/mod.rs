//! Overlap detection between target and buyer fact sets.

mod engine;
mod prompt;
mod response;

pub use engine::{OverlapEngine, OverlapError, OverlapSet};
