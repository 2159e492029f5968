//! Vector store builder.
//!
//! Ensures a persisted collection exists at the storage location. The first
//! build embeds every review; later calls only open what is already there.

use std::path::{Path, PathBuf};

use super::dataset::{fingerprint, load_documents};
use super::sqlite::SqliteRagStore;
use super::store::{RagStore, ReviewDocument};
use crate::core::config::{AppConfig, AppPaths};
use crate::core::errors::QaError;
use crate::llm::LlmProvider;

/// Where the dataset and the collection live, and which model embeds them.
#[derive(Debug, Clone)]
pub struct StoreParams {
    pub csv_path: PathBuf,
    pub db_location: PathBuf,
    pub collection_name: String,
    pub embed_model: String,
    pub embed_batch_size: usize,
}

impl StoreParams {
    pub fn from_config(config: &AppConfig, paths: &AppPaths) -> Self {
        Self {
            csv_path: paths.resolve(&config.dataset.csv_path),
            db_location: paths.resolve(&config.vector_store.db_location),
            collection_name: config.vector_store.collection_name.clone(),
            embed_model: config.vector_store.embed_model.clone(),
            embed_batch_size: config.vector_store.embed_batch_size.max(1),
        }
    }

    pub fn store_exists(&self) -> bool {
        self.db_location.exists()
    }
}

/// Build the collection if the storage location is absent, otherwise open it.
///
/// An existing store is never modified, even when the dataset has changed
/// since it was built; a fingerprint mismatch is only logged.
pub async fn build_vector_store(
    params: &StoreParams,
    embedder: &dyn LlmProvider,
) -> Result<SqliteRagStore, QaError> {
    if params.store_exists() {
        let store = SqliteRagStore::open(&params.db_location, &params.collection_name).await?;
        warn_if_stale(&store, params).await;
        tracing::info!(
            "Opened vector store at {} (collection '{}')",
            params.db_location.display(),
            params.collection_name
        );
        return Ok(store);
    }

    tracing::info!(
        "Building vector store at {} from {}",
        params.db_location.display(),
        params.csv_path.display()
    );

    // Embed before touching the disk so a failed build leaves no directory.
    let documents = load_documents(&params.csv_path)?;
    let items = embed_documents(documents, params, embedder).await?;
    let dataset_fingerprint = fingerprint(&params.csv_path).ok();

    match populate(params, items, dataset_fingerprint.as_deref()).await {
        Ok(store) => Ok(store),
        Err(err) => {
            remove_partial_store(&params.db_location).await;
            Err(err)
        }
    }
}

async fn embed_documents(
    documents: Vec<ReviewDocument>,
    params: &StoreParams,
    embedder: &dyn LlmProvider,
) -> Result<Vec<(ReviewDocument, Vec<f32>)>, QaError> {
    let mut items = Vec::with_capacity(documents.len());

    for batch in documents.chunks(params.embed_batch_size) {
        let inputs: Vec<String> = batch.iter().map(|d| d.content.clone()).collect();
        let vectors = embedder.embed(&inputs, &params.embed_model).await?;
        if vectors.len() != batch.len() {
            return Err(QaError::Embedding(format!(
                "expected {} embeddings, got {}",
                batch.len(),
                vectors.len()
            )));
        }
        items.extend(batch.iter().cloned().zip(vectors));
    }

    Ok(items)
}

async fn populate(
    params: &StoreParams,
    items: Vec<(ReviewDocument, Vec<f32>)>,
    dataset_fingerprint: Option<&str>,
) -> Result<SqliteRagStore, QaError> {
    let count = items.len();
    let store = SqliteRagStore::open(&params.db_location, &params.collection_name).await?;
    store.insert_batch(items).await?;
    store
        .record_build(&params.embed_model, dataset_fingerprint)
        .await?;

    if let Err(err) = store.persist().await {
        tracing::warn!("Best-effort persist of vector store failed: {}", err);
    }

    tracing::info!(
        "Built collection '{}' with {} documents",
        params.collection_name,
        count
    );
    Ok(store)
}

async fn warn_if_stale(store: &SqliteRagStore, params: &StoreParams) {
    let info = match store.collection_info().await {
        Ok(info) => info,
        Err(err) => {
            tracing::warn!("Could not read collection metadata: {}", err);
            return;
        }
    };

    if let Some(model) = info.embed_model.as_deref() {
        if model != params.embed_model {
            tracing::warn!(
                "Collection '{}' was embedded with '{}' but '{}' is configured; delete {} to rebuild",
                params.collection_name,
                model,
                params.embed_model,
                params.db_location.display()
            );
        }
    }

    let (Some(recorded), Ok(current)) = (
        info.dataset_fingerprint.as_deref(),
        fingerprint(&params.csv_path),
    ) else {
        return;
    };
    if recorded != current {
        tracing::warn!(
            "Dataset {} changed since the vector store was built; answers use the old reviews until {} is deleted",
            params.csv_path.display(),
            params.db_location.display()
        );
    }
}

async fn remove_partial_store(db_location: &Path) {
    if let Err(err) = tokio::fs::remove_dir_all(db_location).await {
        tracing::warn!(
            "Failed to remove partial vector store {}: {}",
            db_location.display(),
            err
        );
    }
}
