pub mod ollama;
pub mod provider;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;
mod tests;

pub use ollama::OllamaProvider;
pub use provider::LlmProvider;
pub use types::{ChatMessage, ChatRequest};
