use super::error::BackendError;
use super::types::{LlmRequest, LlmResponse};
use async_trait::async_trait;

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat(&self, request: LlmRequest) -> Result<LlmResponse, BackendError>;

    fn name(&self) -> &str;

    fn model_info(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct TestClient;

    #[async_trait]
    impl LlmClient for TestClient {
        async fn chat(&self, _request: LlmRequest) -> Result<LlmResponse, BackendError> {
            Ok(LlmResponse::text("{}", Duration::from_millis(5)))
        }

        fn name(&self) -> &str {
            "TestClient"
        }
    }

    #[tokio::test]
    async fn test_client_trait_object_safety() {
        let client: Box<dyn LlmClient> = Box::new(TestClient);
        assert_eq!(client.name(), "TestClient");
        assert!(client.model_info().is_none());
    }
}
