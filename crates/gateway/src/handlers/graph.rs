//! Provenance graph handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::AppState;
use biospace_common::errors::Result;
use biospace_search::KnowledgeGraph;

/// Graph query parameters
#[derive(Debug, Deserialize)]
pub struct GraphParams {
    /// Focus node; omitted returns the whole graph
    pub node_id: Option<String>,

    /// Hops around the focus node (default 1)
    pub depth: Option<usize>,
}

/// Whole graph or a focus node's neighborhood
pub async fn get_graph(
    State(state): State<AppState>,
    Query(params): Query<GraphParams>,
) -> Result<Json<KnowledgeGraph>> {
    let graph = state
        .service
        .build_graph(params.node_id.as_deref(), params.depth)?;
    Ok(Json(graph))
}
