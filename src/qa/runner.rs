use std::sync::Arc;

use super::prompt::render_prompt;
use crate::llm::{ChatRequest, LlmProvider};

/// Renders the review prompt and asks the model, never failing: the
/// structured chat call is tried when plain generation fails, and if that
/// fails too the error text becomes the answer.
#[derive(Clone)]
pub struct PromptRunner {
    llm: Arc<dyn LlmProvider>,
    model: String,
}

impl PromptRunner {
    pub fn new(llm: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    pub async fn run(&self, question: &str, reviews: &str) -> String {
        let prompt = render_prompt(reviews, question);
        self.invoke(&prompt).await
    }

    pub async fn invoke(&self, prompt: &str) -> String {
        let primary_err = match self.llm.generate(prompt, &self.model).await {
            Ok(answer) => return answer,
            Err(err) => err,
        };
        tracing::warn!(
            "{} generate failed, retrying with chat input: {}",
            self.llm.name(),
            primary_err
        );

        match self
            .llm
            .chat(ChatRequest::from_prompt(prompt), &self.model)
            .await
        {
            Ok(answer) => answer,
            Err(err) => {
                tracing::warn!("{} chat failed: {}", self.llm.name(), err);
                format!("Model invoke error: {}", err)
            }
        }
    }
}
