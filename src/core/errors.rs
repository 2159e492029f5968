use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QaError {
    #[error(
        "vector store not found at {}. Run `review-qa build` or allow rebuild_if_missing.",
        .0.display()
    )]
    StoreNotFound(PathBuf),
    #[error("dataset error: {0}")]
    Dataset(String),
    #[error("embedding error: {0}")]
    Embedding(String),
    #[error("llm error: {0}")]
    Llm(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl QaError {
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        QaError::Internal(err.to_string())
    }

    pub fn store<E: std::fmt::Display>(err: E) -> Self {
        QaError::Store(err.to_string())
    }

    pub fn llm<E: std::fmt::Display>(err: E) -> Self {
        QaError::Llm(err.to_string())
    }

    pub fn is_store_not_found(&self) -> bool {
        matches!(self, QaError::StoreNotFound(_))
    }
}
