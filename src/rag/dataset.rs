//! Review dataset loading.
//!
//! Reads the review CSV (`Title`, `Review`, optional `Rating`, `Date`) into
//! `ReviewRecord`s and turns them into `ReviewDocument`s keyed by row index.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::store::{DocumentMetadata, ReviewDocument};
use crate::core::errors::QaError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReviewRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Review")]
    pub body: String,
    #[serde(rename = "Rating", default, deserialize_with = "csv::invalid_option")]
    pub rating: Option<f64>,
    #[serde(rename = "Date", default, deserialize_with = "csv::invalid_option")]
    pub date: Option<String>,
}

impl ReviewRecord {
    pub fn into_document(self, index: usize) -> ReviewDocument {
        ReviewDocument {
            id: index.to_string(),
            content: format!("{} {}", self.title, self.body),
            metadata: DocumentMetadata {
                rating: self.rating,
                date: self.date,
            },
        }
    }
}

pub fn load_reviews(csv_path: &Path) -> Result<Vec<ReviewRecord>, QaError> {
    let mut reader = csv::Reader::from_path(csv_path)
        .map_err(|e| QaError::Dataset(format!("{}: {}", csv_path.display(), e)))?;

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<ReviewRecord>().enumerate() {
        let record = row.map_err(|e| {
            QaError::Dataset(format!("{} row {}: {}", csv_path.display(), index, e))
        })?;
        records.push(record);
    }

    Ok(records)
}

pub fn load_documents(csv_path: &Path) -> Result<Vec<ReviewDocument>, QaError> {
    Ok(load_reviews(csv_path)?
        .into_iter()
        .enumerate()
        .map(|(index, record)| record.into_document(index))
        .collect())
}

/// SHA-256 of the dataset file, hex encoded.
pub fn fingerprint(csv_path: &Path) -> Result<String, QaError> {
    let bytes = fs::read(csv_path)
        .map_err(|e| QaError::Dataset(format!("{}: {}", csv_path.display(), e)))?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}
