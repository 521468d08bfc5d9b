//! GenAI-backed capability client.
//!
//! Supports every provider the `genai` crate exposes (Ollama, OpenAI,
//! Anthropic, Gemini, xAI, Groq); the provider and model come from
//! configuration.

use super::client::LlmClient;
use super::error::BackendError;
use super::types::{ChatMessage, LlmRequest, LlmResponse, MessageRole};
use async_trait::async_trait;
use genai::adapter::AdapterKind;
use genai::chat::{ChatMessage as GenAiChatMessage, ChatOptions, ChatRequest};
use genai::Client;
use std::time::Duration;
use tracing::{debug, error};

pub struct GenAiClient {
    client: Client,
    model: String,
    provider: AdapterKind,
    timeout: Duration,
}

impl GenAiClient {
    pub fn new(provider: AdapterKind, model: String, timeout: Duration) -> Self {
        debug!(
            "Creating GenAI client: provider={}, model={}",
            provider.as_str(),
            model
        );
        Self {
            client: Client::default(),
            model,
            provider,
            timeout,
        }
    }

    fn convert_message(msg: &ChatMessage) -> GenAiChatMessage {
        match msg.role {
            MessageRole::System => GenAiChatMessage::system(&msg.content),
            MessageRole::User => GenAiChatMessage::user(&msg.content),
        }
    }
}

#[async_trait]
impl LlmClient for GenAiClient {
    async fn chat(&self, request: LlmRequest) -> Result<LlmResponse, BackendError> {
        let start = std::time::Instant::now();

        let messages: Vec<GenAiChatMessage> =
            request.messages.iter().map(Self::convert_message).collect();
        let genai_request = ChatRequest::new(messages);

        let mut options = ChatOptions::default();
        if let Some(temp) = request.temperature {
            options = options.with_temperature(temp as f64);
        }
        if let Some(max_tokens) = request.max_tokens {
            options = options.with_max_tokens(max_tokens);
        }

        let response = match tokio::time::timeout(
            self.timeout,
            self.client
                .exec_chat(&self.model, genai_request, Some(&options)),
        )
        .await
        {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => {
                error!("{} API error: {}", self.provider.as_str(), e);
                return Err(BackendError::Api {
                    message: format!("{} request failed: {}", self.provider.as_str(), e),
                });
            }
            Err(_) => {
                error!(
                    "{} request timed out after {}s",
                    self.provider.as_str(),
                    self.timeout.as_secs()
                );
                return Err(BackendError::Timeout {
                    seconds: self.timeout.as_secs(),
                });
            }
        };

        let content = response.first_text().unwrap_or_default().to_string();
        Ok(LlmResponse::text(content, start.elapsed()))
    }

    fn name(&self) -> &str {
        self.provider.as_str()
    }

    fn model_info(&self) -> Option<String> {
        Some(self.model.clone())
    }
}

impl std::fmt::Debug for GenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenAiClient")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}
