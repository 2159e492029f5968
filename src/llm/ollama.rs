use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};

use super::provider::LlmProvider;
use super::types::ChatRequest;
use crate::core::errors::QaError;

#[derive(Clone)]
pub struct OllamaProvider {
    base_url: String,
    client: Client,
}

impl OllamaProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, QaError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(QaError::internal)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Response, String> {
        let url = format!("{}{}", self.base_url, path);
        let res = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if res.status().is_success() {
            return Ok(res);
        }

        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        Err(format!("{} ({}): {}", path, status, error_message(&text)))
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Ollama reports failures as `{"error": "..."}`; fall back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn health_check(&self) -> Result<bool, QaError> {
        let url = format!("{}/api/tags", self.base_url);
        match self.client.get(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    async fn generate(&self, prompt: &str, model_id: &str) -> Result<String, QaError> {
        let body = json!({
            "model": model_id,
            "prompt": prompt,
            "stream": false,
        });

        let res = self
            .post_json("/api/generate", &body)
            .await
            .map_err(|e| QaError::Llm(format!("Ollama generate error {}", e)))?;
        let payload: GenerateResponse = res.json().await.map_err(QaError::llm)?;

        Ok(payload.response)
    }

    async fn chat(&self, request: ChatRequest, model_id: &str) -> Result<String, QaError> {
        let body = json!({
            "model": model_id,
            "messages": request.messages,
            "stream": false,
        });

        let res = self
            .post_json("/api/chat", &body)
            .await
            .map_err(|e| QaError::Llm(format!("Ollama chat error {}", e)))?;
        let payload: ChatResponse = res.json().await.map_err(QaError::llm)?;

        Ok(payload.message.content)
    }

    async fn embed(&self, inputs: &[String], model_id: &str) -> Result<Vec<Vec<f32>>, QaError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let body = json!({
            "model": model_id,
            "input": inputs,
        });

        let res = self
            .post_json("/api/embed", &body)
            .await
            .map_err(|e| QaError::Embedding(format!("Ollama embed error {}", e)))?;
        let payload: EmbedResponse = res
            .json()
            .await
            .map_err(|e| QaError::Embedding(e.to_string()))?;

        if payload.embeddings.len() != inputs.len() {
            return Err(QaError::Embedding(format!(
                "expected {} embeddings, got {}",
                inputs.len(),
                payload.embeddings.len()
            )));
        }

        Ok(payload.embeddings)
    }
}
