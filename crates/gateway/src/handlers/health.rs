//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub status: String,
    pub corpus: CorpusStatus,
}

#[derive(Serialize)]
pub struct CorpusStatus {
    pub version: u64,
    pub documents: usize,
    pub digest: String,
    pub loaded_at: String,
}

/// Liveness probe - always returns healthy if server is running
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// Readiness probe - reports the installed corpus snapshot
pub async fn ready(State(state): State<AppState>) -> Json<ReadyResponse> {
    let snapshot = state.service.snapshot();

    // Version 0 means no corpus was ever installed
    let status = if snapshot.version() > 0 { "ready" } else { "not_ready" };

    Json(ReadyResponse {
        status: status.to_string(),
        corpus: CorpusStatus {
            version: snapshot.version(),
            documents: snapshot.len(),
            digest: snapshot.digest().to_string(),
            loaded_at: snapshot.loaded_at().to_rfc3339(),
        },
    })
}
