//! Document lookup handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::AppState;
use biospace_common::{errors::Result, Document};

/// Per-source document counts
#[derive(Serialize)]
pub struct CountsResponse {
    pub counts: BTreeMap<String, usize>,
    pub total: usize,
}

/// Get a document by id
pub async fn get_document(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<Json<Document>> {
    let document = state.service.get_document(&document_id)?;
    Ok(Json(document))
}

/// Document count per source label
pub async fn counts(State(state): State<AppState>) -> Json<CountsResponse> {
    let counts = state.service.counts();
    let total = counts.values().sum();
    Json(CountsResponse { counts, total })
}
