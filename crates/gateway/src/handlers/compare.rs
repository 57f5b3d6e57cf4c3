//! Comparison handlers

use axum::{extract::State, Json};
use serde::Deserialize;
use validator::Validate;

use crate::AppState;
use biospace_common::{
    errors::{AppError, Result},
    ComparisonResult,
};

/// Compare request
#[derive(Debug, Deserialize, Validate)]
pub struct CompareBody {
    /// Document ids; at least 2 must resolve
    #[validate(length(max = 50))]
    pub ids: Vec<String>,
}

/// Cross-document synthesis
pub async fn compare(
    State(state): State<AppState>,
    Json(body): Json<CompareBody>,
) -> Result<Json<ComparisonResult>> {
    body.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: Some("ids".to_string()),
    })?;

    let result = state.service.compare(&body.ids)?;
    Ok(Json(result))
}
