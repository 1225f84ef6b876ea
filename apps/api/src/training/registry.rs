//! Model Registry: owns the model lifecycle and hands out scorers.
//!
//! State transitions:
//!   Uninitialized → Loading  → Ready
//!   Uninitialized → Training → Ready | Fallback
//!   Ready → Ready (retrain swaps the artifact only after it is persisted)
//!
//! Readers take an `Arc` snapshot under a short read lock and score without
//! holding it; retraining never blocks scoring.
//!
//! A retrain runs on its own task and owns the training lock until it has
//! finished, so dropping the caller's future (a client disconnect) neither
//! cancels it nor lets a second retrain start alongside it.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::matching::scorer::{ForestScorer, MatchScorer, RuleBasedScorer};
use crate::matching::semantic::SemanticEncoder;
use crate::training::artifact::{ArtifactMetadata, ModelArtifact};
use crate::training::trainer::{Trainer, TrainingError};

#[derive(Debug, Clone)]
pub enum ModelState {
    Uninitialized,
    Loading,
    Training,
    Ready(Arc<ModelArtifact>),
    Fallback { reason: String },
}

impl ModelState {
    pub fn label(&self) -> &'static str {
        match self {
            ModelState::Uninitialized => "uninitialized",
            ModelState::Loading => "loading",
            ModelState::Training => "training",
            ModelState::Ready(_) => "ready",
            ModelState::Fallback { .. } => "fallback",
        }
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("a retrain is already in progress")]
    Busy,

    #[error(transparent)]
    Training(#[from] TrainingError),
}

/// Snapshot served by `GET /api/v1/model`.
#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    pub state: &'static str,
    pub model_used: &'static str,
    pub retraining: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ArtifactMetadata>,
}

pub struct ModelRegistry {
    trainer: Arc<Trainer>,
    encoder: Arc<dyn SemanticEncoder>,
    state: Arc<RwLock<ModelState>>,
    training: Arc<Mutex<()>>,
}

impl ModelRegistry {
    pub fn new(trainer: Trainer, encoder: Arc<dyn SemanticEncoder>) -> Self {
        Self {
            trainer: Arc::new(trainer),
            encoder,
            state: Arc::new(RwLock::new(ModelState::Uninitialized)),
            training: Arc::new(Mutex::new(())),
        }
    }

    /// Loads the persisted artifact, or trains one, or settles on the
    /// rule-based fallback. Never fails.
    pub async fn bootstrap(&self, force_retrain: bool) {
        let model_path = self.trainer.config().model_path.clone();

        if force_retrain {
            info!("FORCE_RETRAIN set, ignoring any existing model");
        } else if model_path.exists() {
            self.set_state(ModelState::Loading);
            let encoder_id = self.encoder.id();
            let path = model_path.clone();
            let loaded =
                tokio::task::spawn_blocking(move || ModelArtifact::load(&path, &encoder_id)).await;

            match loaded {
                Ok(Ok(artifact)) => {
                    info!(
                        "Loaded model from {} (trained {})",
                        model_path.display(),
                        artifact.metadata.trained_at
                    );
                    self.set_state(ModelState::Ready(Arc::new(artifact)));
                    return;
                }
                Ok(Err(e)) => warn!("Could not load model from {}: {e}. Retraining.", model_path.display()),
                Err(e) => warn!("Model load task failed: {e}. Retraining."),
            }
        } else {
            info!("No model at {}, training a new one", model_path.display());
        }

        match self.retrain().await {
            Ok(_) => {}
            Err(e) => warn!("Training failed, serving rule-based fallback: {e}"),
        }
    }

    /// Trains and swaps in a new artifact. Exclusive: a concurrent call gets
    /// `RegistryError::Busy`. On failure a Ready model stays active.
    pub async fn retrain(&self) -> Result<Arc<ModelArtifact>, RegistryError> {
        let guard = Arc::clone(&self.training)
            .try_lock_owned()
            .map_err(|_| RegistryError::Busy)?;

        let was_ready = matches!(*self.read_state(), ModelState::Ready(_));
        if !was_ready {
            self.set_state(ModelState::Training);
        }

        let trainer = Arc::clone(&self.trainer);
        let state = Arc::clone(&self.state);
        let task = tokio::spawn(async move {
            let _guard = guard;
            let result = match tokio::task::spawn_blocking(move || trainer.train()).await {
                Ok(result) => result,
                Err(e) => Err(TrainingError::Panicked(e.to_string())),
            };

            match result {
                Ok(artifact) => {
                    let artifact = Arc::new(artifact);
                    write_state(&state, ModelState::Ready(Arc::clone(&artifact)));
                    info!("Model ready (trained {})", artifact.metadata.trained_at);
                    Ok(artifact)
                }
                Err(e) => {
                    if !was_ready {
                        write_state(
                            &state,
                            ModelState::Fallback {
                                reason: e.to_string(),
                            },
                        );
                    }
                    Err(e)
                }
            }
        });

        match task.await {
            Ok(result) => result.map_err(RegistryError::from),
            Err(e) => Err(TrainingError::Panicked(e.to_string()).into()),
        }
    }

    pub fn state(&self) -> ModelState {
        self.read_state().clone()
    }

    pub fn artifact(&self) -> Option<Arc<ModelArtifact>> {
        match &*self.read_state() {
            ModelState::Ready(artifact) => Some(Arc::clone(artifact)),
            _ => None,
        }
    }

    /// Scorer for the current snapshot.
    pub fn scorer(&self) -> Arc<dyn MatchScorer> {
        match self.artifact() {
            Some(artifact) => Arc::new(ForestScorer::new(artifact, Arc::clone(&self.encoder))),
            None => Arc::new(RuleBasedScorer),
        }
    }

    pub fn status(&self) -> ModelStatus {
        let state = self.state();
        let (model_used, reason, metadata) = match &state {
            ModelState::Ready(a) => (ForestScorer::NAME, None, Some(a.metadata.clone())),
            ModelState::Fallback { reason } => {
                (RuleBasedScorer::NAME, Some(reason.clone()), None)
            }
            _ => (RuleBasedScorer::NAME, None, None),
        };
        ModelStatus {
            state: state.label(),
            model_used,
            retraining: self.training.try_lock().is_err(),
            reason,
            metadata,
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, ModelState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, next: ModelState) {
        write_state(&self.state, next);
    }
}

fn write_state(state: &RwLock<ModelState>, next: ModelState) {
    let mut state = state.write().unwrap_or_else(PoisonError::into_inner);
    *state = next;
}
