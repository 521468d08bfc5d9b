//! Reasoning-capability client abstraction.
//!
//! The engine treats the generative model as a black-box text-completion
//! capability: structured prompt in, structured (schema-validated) response
//! out. This module provides the trait plus a genai-backed implementation
//! and a mock for tests.

mod client;
mod error;
mod genai;
mod json;
mod mock;
mod types;

pub use client::LlmClient;
pub use error::BackendError;
pub use genai::GenAiClient;
pub use json::extract_json;
pub use mock::{MockLlmClient, MockResponse};
pub use types::{ChatMessage, LlmRequest, LlmResponse, MessageRole};
