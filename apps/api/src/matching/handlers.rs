//! Axum route handlers for the Match and Model APIs.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::predictor::calculate_match;
use crate::models::match_result::MatchResult;
use crate::state::AppState;
use crate::training::artifact::TrainingMetrics;
use crate::training::ModelStatus;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    #[serde(default)]
    pub resume_text: String,
    pub target_job: String,
}

#[derive(Debug, Serialize)]
pub struct ModelStatusResponse {
    #[serde(flatten)]
    pub status: ModelStatus,
    pub model_path: String,
    pub dataset_path: String,
}

#[derive(Debug, Serialize)]
pub struct RetrainResponse {
    pub status: &'static str,
    pub trained_at: DateTime<Utc>,
    pub metrics: TrainingMetrics,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match
pub async fn handle_match(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<MatchResult>, AppError> {
    if req.target_job.trim().is_empty() {
        return Err(AppError::Validation("target_job must not be empty".into()));
    }

    let scorer = state.registry.scorer();
    let result = tokio::task::spawn_blocking(move || {
        calculate_match(scorer.as_ref(), &req.resume_text, &req.target_job)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("match task failed: {e}")))?;

    Ok(Json(result))
}

/// GET /api/v1/model
pub async fn handle_model_status(State(state): State<AppState>) -> Json<ModelStatusResponse> {
    Json(ModelStatusResponse {
        status: state.registry.status(),
        model_path: state.config.model_path.display().to_string(),
        dataset_path: state.config.dataset_path.display().to_string(),
    })
}

/// POST /api/v1/model/retrain
///
/// Blocks until training finishes. The previous model keeps serving meanwhile
/// and stays active if training fails.
pub async fn handle_retrain(
    State(state): State<AppState>,
) -> Result<Json<RetrainResponse>, AppError> {
    let artifact = state.registry.retrain().await?;
    Ok(Json(RetrainResponse {
        status: "ready",
        trained_at: artifact.metadata.trained_at,
        metrics: artifact.metadata.metrics.clone(),
    }))
}
