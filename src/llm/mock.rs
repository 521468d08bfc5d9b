use super::client::LlmClient;
use super::error::BackendError;
use super::types::{LlmRequest, LlmResponse};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Queue-backed capability client for tests.
///
/// Responses are consumed in insertion order; an exhausted queue is an
/// error so tests notice unexpected extra calls.
pub struct MockLlmClient {
    responses: Mutex<VecDeque<MockResponse>>,
    requests: Mutex<Vec<LlmRequest>>,
    name: String,
}

#[derive(Debug, Clone)]
pub struct MockResponse {
    pub content: String,
    pub error: Option<BackendError>,
}

impl MockResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            error: None,
        }
    }

    pub fn error(error: BackendError) -> Self {
        Self {
            content: String::new(),
            error: Some(error),
        }
    }

    /// A response that is syntactically not JSON; exercises the
    /// schema-validation failure path.
    pub fn garbage() -> Self {
        Self::text("I could not produce the requested structure, sorry.")
    }
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            name: "MockLlm".to_string(),
        }
    }

    pub fn add_response(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn add_responses(&self, responses: impl IntoIterator<Item = MockResponse>) {
        let mut queue = self.responses.lock().unwrap();
        for response in responses {
            queue.push_back(response);
        }
    }

    pub fn remaining_responses(&self) -> usize {
        self.responses.lock().unwrap().len()
    }

    /// Prompts seen so far, for asserting on prompt content.
    pub fn recorded_requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn chat(&self, request: LlmRequest) -> Result<LlmResponse, BackendError> {
        self.requests.lock().unwrap().push(request);

        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| BackendError::other("MockLlmClient: no more responses in queue"))?;

        if let Some(error) = response.error {
            return Err(error);
        }

        Ok(LlmResponse::text(response.content, Duration::from_millis(1)))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model_info(&self) -> Option<String> {
        Some("mock-model".to_string())
    }
}

impl std::fmt::Debug for MockLlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockLlmClient")
            .field("name", &self.name)
            .field("remaining_responses", &self.remaining_responses())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ChatMessage;

    #[tokio::test]
    async fn test_responses_consumed_in_order() {
        let client = MockLlmClient::new();
        client.add_responses(vec![MockResponse::text("first"), MockResponse::text("second")]);

        let r1 = client.chat(LlmRequest::new(vec![])).await.unwrap();
        assert_eq!(r1.content, "first");
        let r2 = client.chat(LlmRequest::new(vec![])).await.unwrap();
        assert_eq!(r2.content, "second");
        assert_eq!(client.remaining_responses(), 0);
    }

    #[tokio::test]
    async fn test_error_injection() {
        let client = MockLlmClient::new();
        client.add_response(MockResponse::error(BackendError::Timeout { seconds: 30 }));

        let result = client.chat(LlmRequest::new(vec![])).await;
        assert!(matches!(result, Err(BackendError::Timeout { seconds: 30 })));
    }

    #[tokio::test]
    async fn test_exhausted_queue_is_error() {
        let client = MockLlmClient::new();
        assert!(client.chat(LlmRequest::new(vec![])).await.is_err());
    }

    #[tokio::test]
    async fn test_records_requests() {
        let client = MockLlmClient::new();
        client.add_response(MockResponse::text("ok"));
        client
            .chat(LlmRequest::new(vec![ChatMessage::user("hello")]))
            .await
            .unwrap();

        let recorded = client.recorded_requests();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].messages[0].content, "hello");
    }
}
