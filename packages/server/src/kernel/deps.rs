//! Server dependencies for request handlers (using traits for testability)
//!
//! The completion and storage capabilities are built once at startup from
//! environment configuration and injected into handlers through this
//! container, so the test suite can substitute mocks.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient};

use super::traits::{BaseCompletion, BaseComparisonStore};

// =============================================================================
// OpenAIClient Adapter (implements BaseCompletion trait)
// =============================================================================

/// Wrapper around OpenAIClient that implements the BaseCompletion trait
pub struct OpenAICompletion(pub OpenAIClient);

impl OpenAICompletion {
    pub fn new(client: OpenAIClient) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseCompletion for OpenAICompletion {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        model: &str,
        temperature: f32,
    ) -> Result<Option<String>> {
        let request = ChatRequest::new(model)
            .message(Message::system(system_prompt))
            .message(Message::user(user_prompt))
            .temperature(temperature);

        let response = self
            .0
            .chat_completion(request)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        Ok(response.content)
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to request handlers
#[derive(Clone)]
pub struct ServerDeps {
    /// Comparison persistence
    pub store: Arc<dyn BaseComparisonStore>,
    /// LLM completion capability
    pub completion: Arc<dyn BaseCompletion>,
}

impl ServerDeps {
    pub fn new(
        store: Arc<dyn BaseComparisonStore>,
        completion: Arc<dyn BaseCompletion>,
    ) -> Self {
        Self { store, completion }
    }
}
