//! RAG (Retrieval-Augmented Generation) module.
//!
//! This module provides:
//! - `build_vector_store`: embeds the review dataset into a persisted collection
//! - `SqliteRagStore`: the collection, with cosine and keyword search
//! - `VectorRetriever`: top-k search over the collection
//! - `ContextBuilder`: joins retrieved reviews within a character budget

pub mod builder;
pub mod context_builder;
pub mod dataset;
pub mod retriever;
pub mod sqlite;
pub mod store;

pub use builder::{build_vector_store, StoreParams};
pub use context_builder::{assemble, ContextBuilder};
pub use dataset::{load_reviews, ReviewRecord};
pub use retriever::{get_or_build_retriever, get_retriever, Retriever, VectorRetriever};
pub use sqlite::SqliteRagStore;
pub use store::{DocumentMetadata, RagStore, ReviewDocument, SearchResult};
