//! Immutable corpus snapshot

use crate::errors::{AppError, Result};
use crate::models::Document;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};

/// One validated, never-mutated version of the document set
#[derive(Debug)]
pub struct CorpusSnapshot {
    version: u64,
    loaded_at: DateTime<Utc>,
    digest: String,
    documents: Vec<Document>,
    by_id: HashMap<String, usize>,
}

impl CorpusSnapshot {
    /// Validate documents and build a snapshot.
    ///
    /// Fails with `InvalidCorpus` on a blank or repeated id.
    pub fn new(version: u64, documents: Vec<Document>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(documents.len());

        for (idx, doc) in documents.iter().enumerate() {
            if doc.id.trim().is_empty() {
                return Err(AppError::InvalidCorpus {
                    message: format!("document at position {} has a blank id", idx),
                });
            }
            if by_id.insert(doc.id.clone(), idx).is_some() {
                return Err(AppError::InvalidCorpus {
                    message: format!("duplicate document id: {}", doc.id),
                });
            }
        }

        let digest = digest_documents(&documents)?;

        Ok(Self {
            version,
            loaded_at: Utc::now(),
            digest,
            documents,
            by_id,
        })
    }

    /// Snapshot with no documents
    pub fn empty() -> Self {
        Self {
            version: 0,
            loaded_at: Utc::now(),
            digest: hex::encode(Sha256::digest(b"[]")),
            documents: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// SHA-256 of the canonical JSON of the documents
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Documents in load order
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.by_id.get(id).map(|&idx| &self.documents[idx])
    }

    /// Document count per source label
    pub fn source_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for doc in &self.documents {
            *counts.entry(doc.source.clone()).or_insert(0) += 1;
        }
        counts
    }
}

fn digest_documents(documents: &[Document]) -> Result<String> {
    let canonical = serde_json::to_vec(documents)?;
    Ok(hex::encode(Sha256::digest(&canonical)))
}
