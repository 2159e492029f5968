//! RagStore trait — abstract interface for the persisted review collection.
//!
//! The only implementation is `SqliteRagStore`; the retriever and the store
//! builder talk to it through this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::errors::QaError;

/// Metadata carried alongside each review document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub rating: Option<f64>,
    pub date: Option<String>,
}

/// A stored review: `title + " " + body` plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewDocument {
    /// Row index of the source record, as text.
    pub id: String,
    pub content: String,
    pub metadata: DocumentMetadata,
}

/// Result of a similarity search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub document: ReviewDocument,
    /// Similarity score (higher = better).
    pub score: f32,
}

#[async_trait]
pub trait RagStore: Send + Sync {
    /// Insert documents with their embedding vectors in one transaction.
    async fn insert_batch(
        &self,
        items: Vec<(ReviewDocument, Vec<f32>)>,
    ) -> Result<(), QaError>;

    /// Top `limit` documents by cosine similarity to the query embedding.
    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchResult>, QaError>;

    /// Top `limit` documents by share of query terms they contain.
    ///
    /// Used when no query embedding can be computed.
    async fn keyword_search(&self, query: &str, limit: usize)
        -> Result<Vec<SearchResult>, QaError>;

    /// Number of documents in the collection.
    async fn count(&self) -> Result<usize, QaError>;

    /// Flush pending writes to the main database file.
    async fn persist(&self) -> Result<(), QaError>;
}
