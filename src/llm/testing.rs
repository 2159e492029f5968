//! Deterministic in-process provider for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::provider::LlmProvider;
use super::types::ChatRequest;
use crate::core::errors::QaError;

#[derive(Default)]
pub struct ScriptedProvider {
    pub fail_generate: bool,
    pub fail_chat: bool,
    pub fail_embed: bool,
    pub answer: String,
    pub generate_calls: AtomicUsize,
    pub chat_calls: AtomicUsize,
    pub embed_calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_generate: true,
            fail_chat: true,
            fail_embed: true,
            ..Default::default()
        }
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

/// Letter-frequency vector; texts sharing words score close under cosine.
pub fn letter_embedding(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0f32; 26];
    for c in text.chars().filter(|c| c.is_ascii_alphabetic()) {
        let idx = (c.to_ascii_lowercase() as u8 - b'a') as usize;
        vector[idx] += 1.0;
    }
    vector
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn health_check(&self) -> Result<bool, QaError> {
        Ok(!self.fail_generate)
    }

    async fn generate(&self, prompt: &str, _model_id: &str) -> Result<String, QaError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail_generate {
            return Err(QaError::Llm("generate refused".to_string()));
        }
        Ok(self.answer.clone())
    }

    async fn chat(&self, request: ChatRequest, _model_id: &str) -> Result<String, QaError> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = request.messages.last() {
            self.prompts.lock().unwrap().push(message.content.clone());
        }
        if self.fail_chat {
            return Err(QaError::Llm("connection refused".to_string()));
        }
        Ok(format!("chat: {}", self.answer))
    }

    async fn embed(&self, inputs: &[String], _model_id: &str) -> Result<Vec<Vec<f32>>, QaError> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_embed {
            return Err(QaError::Embedding("embedding model unavailable".to_string()));
        }
        Ok(inputs.iter().map(|text| letter_embedding(text)).collect())
    }
}
