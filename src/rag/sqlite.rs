//! SQLite-backed review collection.
//!
//! One database file per storage location, holding any number of named
//! collections. Vectors are stored as little-endian `f32` blobs and searched
//! by brute-force cosine similarity.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};

use super::store::{DocumentMetadata, RagStore, ReviewDocument, SearchResult};
use crate::core::errors::QaError;

pub const DB_FILE_NAME: &str = "collections.sqlite3";

/// Build provenance recorded for a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionInfo {
    pub name: String,
    pub embed_model: Option<String>,
    pub dataset_fingerprint: Option<String>,
    pub built_at: Option<String>,
}

#[derive(Debug)]
pub struct SqliteRagStore {
    pool: SqlitePool,
    collection: String,
    db_path: PathBuf,
}

impl SqliteRagStore {
    /// Open (creating if needed) `collection` inside the storage directory.
    pub async fn open(db_location: &Path, collection: &str) -> Result<Self, QaError> {
        tokio::fs::create_dir_all(db_location)
            .await
            .map_err(QaError::store)?;
        Self::with_path(db_location.join(DB_FILE_NAME), collection).await
    }

    pub async fn with_path(db_path: PathBuf, collection: &str) -> Result<Self, QaError> {
        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(QaError::store)?;

        let store = Self {
            pool,
            collection: collection.to_string(),
            db_path,
        };
        store.init_schema().await?;
        Ok(store)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    async fn init_schema(&self) -> Result<(), QaError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS collections (
                name TEXT PRIMARY KEY,
                embed_model TEXT,
                dataset_fingerprint TEXT,
                built_at TEXT
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(QaError::store)?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL REFERENCES collections(name) ON DELETE CASCADE,
                doc_id TEXT NOT NULL,
                seq INTEGER NOT NULL,
                content TEXT NOT NULL,
                metadata TEXT NOT NULL DEFAULT '{}',
                embedding BLOB,
                PRIMARY KEY (collection, doc_id)
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(QaError::store)?;

        sqlx::query("INSERT OR IGNORE INTO collections (name) VALUES (?1)")
            .bind(&self.collection)
            .execute(&self.pool)
            .await
            .map_err(QaError::store)?;

        Ok(())
    }

    pub async fn collection_info(&self) -> Result<CollectionInfo, QaError> {
        let row = sqlx::query(
            "SELECT name, embed_model, dataset_fingerprint, built_at
             FROM collections
             WHERE name = ?1",
        )
        .bind(&self.collection)
        .fetch_one(&self.pool)
        .await
        .map_err(QaError::store)?;

        Ok(CollectionInfo {
            name: row.get("name"),
            embed_model: row.get("embed_model"),
            dataset_fingerprint: row.get("dataset_fingerprint"),
            built_at: row.get("built_at"),
        })
    }

    pub async fn record_build(
        &self,
        embed_model: &str,
        dataset_fingerprint: Option<&str>,
    ) -> Result<(), QaError> {
        sqlx::query(
            "UPDATE collections
             SET embed_model = ?2, dataset_fingerprint = ?3, built_at = ?4
             WHERE name = ?1",
        )
        .bind(&self.collection)
        .bind(embed_model)
        .bind(dataset_fingerprint)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(QaError::store)?;

        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn serialize_embedding(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn deserialize_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() || a.is_empty() {
            return 0.0;
        }

        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        let denom = norm_a * norm_b;

        if denom <= f32::EPSILON {
            0.0
        } else {
            dot / denom
        }
    }

    fn keyword_score(content: &str, terms: &[String]) -> f32 {
        let content_lower = content.to_lowercase();
        let hits = terms
            .iter()
            .filter(|term| content_lower.contains(term.as_str()))
            .count();
        hits as f32 / terms.len().max(1) as f32
    }

    fn row_to_document(row: &sqlx::sqlite::SqliteRow) -> ReviewDocument {
        let metadata_str: String = row.get("metadata");
        let metadata =
            serde_json::from_str::<DocumentMetadata>(&metadata_str).unwrap_or_default();

        ReviewDocument {
            id: row.get("doc_id"),
            content: row.get("content"),
            metadata,
        }
    }

    fn sort_by_score(results: &mut Vec<SearchResult>, limit: usize) {
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(limit);
    }
}

#[async_trait]
impl RagStore for SqliteRagStore {
    async fn insert_batch(&self, items: Vec<(ReviewDocument, Vec<f32>)>) -> Result<(), QaError> {
        if items.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(QaError::store)?;

        for (seq, (document, embedding)) in items.iter().enumerate() {
            let blob = Self::serialize_embedding(embedding);
            let metadata_str =
                serde_json::to_string(&document.metadata).map_err(QaError::internal)?;

            sqlx::query(
                "INSERT OR REPLACE INTO documents (collection, doc_id, seq, content, metadata, embedding)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(&self.collection)
            .bind(&document.id)
            .bind(seq as i64)
            .bind(&document.content)
            .bind(&metadata_str)
            .bind(&blob)
            .execute(&mut *tx)
            .await
            .map_err(QaError::store)?;
        }

        tx.commit().await.map_err(QaError::store)?;
        tracing::debug!("Inserted {} documents into '{}'", items.len(), self.collection);
        Ok(())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchResult>, QaError> {
        let rows = sqlx::query(
            "SELECT doc_id, content, metadata, embedding
             FROM documents
             WHERE collection = ?1
             ORDER BY seq",
        )
        .bind(&self.collection)
        .fetch_all(&self.pool)
        .await
        .map_err(QaError::store)?;

        let mut scored: Vec<SearchResult> = rows
            .iter()
            .filter_map(|row| {
                let embedding_bytes: Option<Vec<u8>> = row.get("embedding");
                let embedding_bytes = embedding_bytes.filter(|b| !b.is_empty())?;
                let stored = Self::deserialize_embedding(&embedding_bytes);

                Some(SearchResult {
                    document: Self::row_to_document(row),
                    score: Self::cosine_similarity(query_embedding, &stored),
                })
            })
            .collect();

        Self::sort_by_score(&mut scored, limit);
        Ok(scored)
    }

    async fn keyword_search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, QaError> {
        let terms: Vec<String> = query
            .to_lowercase()
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            "SELECT doc_id, content, metadata
             FROM documents
             WHERE collection = ?1
             ORDER BY seq",
        )
        .bind(&self.collection)
        .fetch_all(&self.pool)
        .await
        .map_err(QaError::store)?;

        let mut scored: Vec<SearchResult> = rows
            .iter()
            .map(|row| {
                let document = Self::row_to_document(row);
                let score = Self::keyword_score(&document.content, &terms);
                SearchResult { document, score }
            })
            .filter(|result| result.score > 0.0)
            .collect();

        Self::sort_by_score(&mut scored, limit);
        Ok(scored)
    }

    async fn count(&self) -> Result<usize, QaError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = ?1")
            .bind(&self.collection)
            .fetch_one(&self.pool)
            .await
            .map_err(QaError::store)?;

        Ok(count as usize)
    }

    async fn persist(&self) -> Result<(), QaError> {
        sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
            .execute(&self.pool)
            .await
            .map_err(QaError::store)?;
        Ok(())
    }
}
