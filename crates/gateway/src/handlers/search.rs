//! Search handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use validator::Validate;

use crate::AppState;
use biospace_common::{
    errors::{AppError, Result},
    Answer,
};
use biospace_search::{FacetFilters, ScoredDocument, SearchRequest};

/// Search request
#[derive(Debug, Deserialize, Validate)]
pub struct SearchBody {
    /// Free text; empty lists everything that passes the filters
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub query: String,

    /// Source-label tokens
    #[serde(default)]
    #[validate(length(max = 20))]
    pub sources: Vec<String>,

    #[serde(default)]
    pub filters: FacetFilters,

    /// Restrict to the neighborhood of this graph node
    #[serde(default)]
    pub node_id: Option<String>,

    /// Maximum results to return
    #[serde(default)]
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<usize>,
}

/// Search response
#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub total_results: usize,
    pub items: Vec<ScoredDocument>,
    pub quick_answer: Option<Answer>,
    pub corpus_version: u64,
    pub processing_time_ms: u64,
}

/// Perform a search
pub async fn search(
    State(state): State<AppState>,
    Json(body): Json<SearchBody>,
) -> Result<Json<SearchResponse>> {
    let start = Instant::now();

    body.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let request = SearchRequest {
        query: body.query.clone(),
        sources: body.sources,
        filters: body.filters,
        node_scope: body.node_id,
        // 0 lets the service apply its default
        limit: body.limit.unwrap_or(0),
    };

    let outcome = state.service.search(request);

    Ok(Json(SearchResponse {
        query: body.query,
        total_results: outcome.total,
        items: outcome.items,
        quick_answer: outcome.quick_answer,
        corpus_version: outcome.corpus_version,
        processing_time_ms: start.elapsed().as_millis() as u64,
    }))
}
