use async_trait::async_trait;

use super::types::ChatRequest;
use crate::core::errors::QaError;

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// return the provider name (e.g. "ollama")
    fn name(&self) -> &str;

    /// check if the provider is reachable
    async fn health_check(&self) -> Result<bool, QaError>;

    /// plain text completion from a single prompt
    async fn generate(&self, prompt: &str, model_id: &str) -> Result<String, QaError>;

    /// chat completion (non-streaming)
    async fn chat(&self, request: ChatRequest, model_id: &str) -> Result<String, QaError>;

    /// generate embeddings, one vector per input in input order
    async fn embed(&self, inputs: &[String], model_id: &str) -> Result<Vec<Vec<f32>>, QaError>;
}
