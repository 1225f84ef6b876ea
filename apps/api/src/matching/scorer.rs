//! Match Scoring: pluggable, trait-based scorer that turns a (resume, job)
//! pair into a raw match probability.
//!
//! Default when an artifact is loaded: `ForestScorer`. Otherwise the registry
//! hands out `RuleBasedScorer`, so callers never branch on model availability.

use std::sync::Arc;

use thiserror::Error;

use crate::matching::features::build_features;
use crate::matching::semantic::SemanticEncoder;
use crate::training::artifact::ModelArtifact;
use crate::training::forest::ForestError;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("model inference failed: {0}")]
    Model(#[from] ForestError),

    #[error("scaled features contain NaN or infinite values")]
    NonFinite,

    #[error("match pipeline panicked: {0}")]
    Panicked(String),
}

/// What a scorer sees of one request.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInput<'a> {
    pub resume_text: &'a str,
    pub job_text: &'a str,
    pub matching_skills: usize,
    pub job_skills: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap backends without touching the predictor or handlers.
pub trait MatchScorer: Send + Sync {
    /// Reported to clients as `model_used`.
    fn name(&self) -> &'static str;

    /// Unclamped probability, nominally in [0, 100].
    fn score(&self, input: &ScoringInput<'_>) -> Result<f64, MatchError>;
}

// ────────────────────────────────────────────────────────────────────────────
// ForestScorer
// ────────────────────────────────────────────────────────────────────────────

pub struct ForestScorer {
    artifact: Arc<ModelArtifact>,
    encoder: Arc<dyn SemanticEncoder>,
}

impl ForestScorer {
    pub const NAME: &'static str = "Random Forest v2.0";

    pub fn new(artifact: Arc<ModelArtifact>, encoder: Arc<dyn SemanticEncoder>) -> Self {
        Self { artifact, encoder }
    }
}

impl MatchScorer for ForestScorer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn score(&self, input: &ScoringInput<'_>) -> Result<f64, MatchError> {
        let features = build_features(
            input.resume_text,
            input.job_text,
            &self.artifact.vectorizer,
            self.encoder.as_ref(),
        );
        let scaled = self.artifact.scaler.transform(&features);
        if scaled.iter().any(|v| !v.is_finite()) {
            return Err(MatchError::NonFinite);
        }
        Ok(self.artifact.model.predict(&scaled)?)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// RuleBasedScorer
// ────────────────────────────────────────────────────────────────────────────

/// Share of the job's skills the resume covers, as a percentage.
pub struct RuleBasedScorer;

impl RuleBasedScorer {
    pub const NAME: &'static str = "Rule-Based Fallback";
}

impl MatchScorer for RuleBasedScorer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn score(&self, input: &ScoringInput<'_>) -> Result<f64, MatchError> {
        Ok(input.matching_skills as f64 / input.job_skills.max(1) as f64 * 100.0)
    }
}
