//! Administrative handlers

use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;

use crate::AppState;
use biospace_common::errors::Result;

/// Reseed response
#[derive(Serialize)]
pub struct ReseedResponse {
    pub documents: usize,
    pub version: u64,
}

/// Reload the corpus from its source. Requires the shared admin credential.
pub async fn reseed(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ReseedResponse>> {
    let presented = headers
        .get(state.config.auth.admin_header.as_str())
        .and_then(|v| v.to_str().ok());
    let authorized = state.credential.verify(presented);

    let documents = state.service.reseed(authorized).await?;

    Ok(Json(ReseedResponse {
        documents,
        version: state.service.snapshot().version(),
    }))
}
