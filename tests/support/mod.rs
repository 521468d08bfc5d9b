//! Shared helpers for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use mergescope::llm::{BackendError, LlmClient, LlmRequest, LlmResponse};
use mergescope::model::{Domain, Entity, Fact, FactAttributes, FactId, Provenance};
use std::sync::Mutex;
use std::time::Duration;

pub fn fact(entity: Entity, domain: Domain, seq: u32, claim: &str) -> Fact {
    Fact {
        id: FactId::new(entity, domain, seq),
        domain,
        entity,
        claim: claim.to_string(),
        attributes: FactAttributes::default(),
        provenance: Provenance::new("due-diligence-data-room"),
        confidence: 0.9,
    }
}

pub fn fact_with_category(
    entity: Entity,
    domain: Domain,
    seq: u32,
    claim: &str,
    category: &str,
) -> Fact {
    let mut f = fact(entity, domain, seq, claim);
    f.attributes.category = Some(category.to_string());
    f
}

enum Routed {
    Text(String),
    Error(BackendError),
}

/// Capability client that routes canned responses by prompt content.
///
/// Domain tasks run concurrently, so a plain response queue would be
/// consumed in nondeterministic order; routing on the prompt text keeps
/// each domain's behavior pinned.
pub struct RoutingClient {
    routes: Mutex<Vec<(Vec<String>, Routed)>>,
}

impl RoutingClient {
    pub fn new() -> Self {
        Self {
            routes: Mutex::new(Vec::new()),
        }
    }

    /// Responds with `text` to any prompt containing all `markers`.
    pub fn on(self, markers: &[&str], text: &str) -> Self {
        self.routes.lock().unwrap().push((
            markers.iter().map(|m| m.to_string()).collect(),
            Routed::Text(text.to_string()),
        ));
        self
    }

    /// Fails any prompt containing all `markers` with the given error.
    pub fn error_on(self, markers: &[&str], error: BackendError) -> Self {
        self.routes.lock().unwrap().push((
            markers.iter().map(|m| m.to_string()).collect(),
            Routed::Error(error),
        ));
        self
    }
}

#[async_trait]
impl LlmClient for RoutingClient {
    async fn chat(&self, request: LlmRequest) -> Result<LlmResponse, BackendError> {
        let prompt = request
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let routes = self.routes.lock().unwrap();
        for (markers, routed) in routes.iter() {
            if markers.iter().all(|marker| prompt.contains(marker)) {
                return match routed {
                    Routed::Text(text) => {
                        Ok(LlmResponse::text(text.clone(), Duration::from_millis(1)))
                    }
                    Routed::Error(error) => Err(error.clone()),
                };
            }
        }
        Err(BackendError::other(format!(
            "RoutingClient: no route matched prompt starting {:?}",
            prompt.chars().take(80).collect::<String>()
        )))
    }

    fn name(&self) -> &str {
        "RoutingClient"
    }
}

/// Markers the overlap and reasoning prompts are known to contain.
pub const OVERLAP_PROMPT_MARKER: &str = "comparing the IT estates";
pub const REASONING_PROMPT_MARKER: &str = "performing technology due diligence";
