//! Axum route handlers for the collaborator-facing endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::collaborators::SummaryInput;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

/// POST /api/v1/summary
///
/// Outward-facing summary generation from `{contact, experience, skills}`.
/// Unlike the assembly path, a collaborator failure here propagates as a
/// non-2xx response — the caller applies its own fallback.
pub async fn handle_generate_summary(
    State(state): State<AppState>,
    Json(input): Json<SummaryInput>,
) -> Result<Json<SummaryResponse>, AppError> {
    let summary = state
        .summarizer
        .generate_summary(&input)
        .await
        .map_err(|e| AppError::Summary(e.to_string()))?;
    Ok(Json(SummaryResponse { summary }))
}
