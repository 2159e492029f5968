//! Retriever over the persisted review collection.

use std::sync::Arc;

use async_trait::async_trait;

use super::builder::{build_vector_store, StoreParams};
use super::store::{RagStore, ReviewDocument};
use crate::core::errors::QaError;
use crate::llm::LlmProvider;

#[async_trait]
pub trait Retriever: Send + Sync {
    /// At most `k` documents relevant to `query`, best first.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<ReviewDocument>, QaError>;

    /// The `k` this retriever was configured with.
    fn default_k(&self) -> usize;
}

/// Embeds the query and ranks the collection by cosine similarity, falling
/// back to keyword matching when the query cannot be embedded or scored.
pub struct VectorRetriever {
    store: Arc<dyn RagStore>,
    embedder: Arc<dyn LlmProvider>,
    embed_model: String,
    k: usize,
}

impl VectorRetriever {
    pub fn new(
        store: Arc<dyn RagStore>,
        embedder: Arc<dyn LlmProvider>,
        embed_model: impl Into<String>,
        k: usize,
    ) -> Self {
        Self {
            store,
            embedder,
            embed_model: embed_model.into(),
            k,
        }
    }

    async fn vector_search(&self, query: &str, k: usize) -> Result<Vec<ReviewDocument>, QaError> {
        let mut vectors = self
            .embedder
            .embed(&[query.to_string()], &self.embed_model)
            .await?;
        let query_embedding = vectors
            .pop()
            .ok_or_else(|| QaError::Embedding("no embedding returned for query".to_string()))?;

        let results = self.store.search(&query_embedding, k).await?;
        Ok(results.into_iter().map(|r| r.document).collect())
    }
}

#[async_trait]
impl Retriever for VectorRetriever {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<ReviewDocument>, QaError> {
        match self.vector_search(query, k).await {
            Ok(documents) => Ok(documents),
            Err(err) => {
                tracing::warn!("Vector search failed, falling back to keyword search: {}", err);
                let results = self.store.keyword_search(query, k).await?;
                Ok(results.into_iter().map(|r| r.document).collect())
            }
        }
    }

    fn default_k(&self) -> usize {
        self.k
    }
}

/// Open the collection and wrap it in a retriever returning at most `k`
/// matches per query.
///
/// Fails with `StoreNotFound` when the storage location is absent and
/// `rebuild_if_missing` is false.
pub async fn get_retriever(
    params: &StoreParams,
    k: usize,
    rebuild_if_missing: bool,
    embedder: Arc<dyn LlmProvider>,
) -> Result<VectorRetriever, QaError> {
    if !params.store_exists() && !rebuild_if_missing {
        return Err(QaError::StoreNotFound(params.db_location.clone()));
    }

    let store = build_vector_store(params, embedder.as_ref()).await?;
    Ok(VectorRetriever::new(
        Arc::new(store),
        embedder,
        params.embed_model.clone(),
        k,
    ))
}

/// Startup policy: open an existing store, building it only when missing.
pub async fn get_or_build_retriever(
    params: &StoreParams,
    k: usize,
    embedder: Arc<dyn LlmProvider>,
) -> Result<VectorRetriever, QaError> {
    match get_retriever(params, k, false, embedder.clone()).await {
        Err(err) if err.is_store_not_found() => {
            tracing::info!("{}; building it now (this may take time)", err);
            get_retriever(params, k, true, embedder).await
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedProvider;
    use crate::rag::sqlite::SqliteRagStore;
    use crate::rag::store::DocumentMetadata;

    fn doc(id: &str, content: &str) -> ReviewDocument {
        ReviewDocument {
            id: id.to_string(),
            content: content.to_string(),
            metadata: DocumentMetadata::default(),
        }
    }

    fn params(dir: &tempfile::TempDir) -> StoreParams {
        StoreParams {
            csv_path: dir.path().join("reviews.csv"),
            db_location: dir.path().join("db"),
            collection_name: "restaurant_reviews".to_string(),
            embed_model: "mxbai-embed-large".to_string(),
            embed_batch_size: 64,
        }
    }

    async fn seeded_store(dir: &tempfile::TempDir) -> Arc<SqliteRagStore> {
        let store = SqliteRagStore::open(&dir.path().join("db"), "restaurant_reviews")
            .await
            .unwrap();
        let docs = [
            doc("0", "zzz zzz zzz"),
            doc("1", "pepperoni pizza"),
            doc("2", "quiet patio"),
            doc("3", "pizza oven"),
        ];
        let items = docs
            .iter()
            .map(|d| (d.clone(), crate::llm::testing::letter_embedding(&d.content)))
            .collect();
        store.insert_batch(items).await.unwrap();
        Arc::new(store)
    }

    #[tokio::test]
    async fn search_returns_at_most_k_by_similarity() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir).await;
        let retriever = VectorRetriever::new(
            store,
            Arc::new(ScriptedProvider::answering("")),
            "mxbai-embed-large",
            3,
        );

        let docs = retriever.search("pepperoni pizza", 2).await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "1");
        assert_eq!(retriever.default_k(), 3);
    }

    #[tokio::test]
    async fn falls_back_to_keyword_search_when_embedding_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir).await;
        let embedder = Arc::new(ScriptedProvider::failing());
        let retriever = VectorRetriever::new(store, embedder, "mxbai-embed-large", 3);

        let docs = retriever.search("Pizza?", 3).await.unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn missing_store_without_rebuild_is_store_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let params = params(&dir);

        let result =
            get_retriever(&params, 3, false, Arc::new(ScriptedProvider::answering(""))).await;
        match result {
            Err(QaError::StoreNotFound(path)) => assert_eq!(path, params.db_location),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("expected StoreNotFound"),
        }
        assert!(!params.store_exists());
    }

    #[tokio::test]
    async fn get_or_build_builds_missing_store() {
        let dir = tempfile::tempdir().unwrap();
        let params = params(&dir);
        std::fs::write(
            &params.csv_path,
            "Title,Review\nCrispy,Best pizza in town\nMeh,Soggy salad\n",
        )
        .unwrap();

        let retriever =
            get_or_build_retriever(&params, 3, Arc::new(ScriptedProvider::answering("")))
                .await
                .unwrap();

        assert!(params.store_exists());
        let docs = retriever.search("pizza", 3).await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].content, "Crispy Best pizza in town");
    }
}
