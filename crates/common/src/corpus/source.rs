//! Document sources feeding the corpus store

use crate::errors::{AppError, Result};
use crate::models::Document;
use async_trait::async_trait;
use std::path::PathBuf;

/// Data-loading collaborator: produces a full document set on demand
#[async_trait]
pub trait CorpusSource: Send + Sync {
    /// Load every document
    async fn load(&self) -> Result<Vec<Document>>;

    /// Human-readable origin used in logs and errors
    fn describe(&self) -> String;
}

/// Reads a JSON array of documents from disk
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CorpusSource for JsonFileSource {
    async fn load(&self) -> Result<Vec<Document>> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| AppError::CorpusLoad {
                source_name: self.describe(),
                message: e.to_string(),
            })?;

        serde_json::from_slice(&bytes).map_err(|e| AppError::CorpusLoad {
            source_name: self.describe(),
            message: format!("malformed corpus JSON: {}", e),
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory document set
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    documents: Vec<Document>,
}

impl StaticSource {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }
}

#[async_trait]
impl CorpusSource for StaticSource {
    async fn load(&self) -> Result<Vec<Document>> {
        Ok(self.documents.clone())
    }

    fn describe(&self) -> String {
        format!("static({} documents)", self.documents.len())
    }
}
