use thiserror::Error;

use crate::core::errors::QaError;

#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("Failed to load configuration: {0}")]
    Config(#[source] QaError),

    #[error("Failed to initialize LLM provider: {0}")]
    Llm(#[source] QaError),

    #[error("Failed to open vector store: {0}")]
    Store(#[source] QaError),
}
