//! Model Artifact: the fitted vectorizer, scaler and forest needed to serve
//! predictions without the dataset, plus metadata pinning the feature layout
//! and semantic encoder they were trained against.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::features::{FEATURE_COUNT, FEATURE_NAMES, FEATURE_SCHEMA_VERSION};
use crate::matching::vectorizer::TfidfVectorizer;
use crate::training::forest::RandomForestRegressor;
use crate::training::scaler::StandardScaler;
use crate::training::storage::write_atomically;

/// On-disk layout version of `ModelArtifact` itself.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("artifact encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("incompatible artifact: {0}")]
    Incompatible(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub train_r2: f64,
    /// None when the dataset was too small to hold out a test split.
    pub test_r2: Option<f64>,
    /// `(feature name, importance)` in feature order.
    pub feature_importances: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub format_version: u32,
    pub feature_schema_version: u32,
    pub feature_names: Vec<String>,
    pub encoder: String,
    pub trained_at: DateTime<Utc>,
    pub metrics: TrainingMetrics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub metadata: ArtifactMetadata,
    pub vectorizer: TfidfVectorizer,
    pub scaler: StandardScaler,
    pub model: RandomForestRegressor,
}

impl ModelArtifact {
    pub fn new(
        encoder: String,
        metrics: TrainingMetrics,
        vectorizer: TfidfVectorizer,
        scaler: StandardScaler,
        model: RandomForestRegressor,
    ) -> Self {
        Self {
            metadata: ArtifactMetadata {
                format_version: ARTIFACT_FORMAT_VERSION,
                feature_schema_version: FEATURE_SCHEMA_VERSION,
                feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
                encoder,
                trained_at: Utc::now(),
                metrics,
            },
            vectorizer,
            scaler,
            model,
        }
    }

    /// Persists atomically: a crash mid-write never leaves a torn artifact.
    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        write_atomically(path, |out| {
            bincode::serialize_into(out, self)?;
            Ok::<(), ArtifactError>(())
        })
    }

    /// Loads and validates against the running encoder.
    pub fn load(path: &Path, encoder_id: &str) -> Result<Self, ArtifactError> {
        let file = File::open(path)?;
        let artifact: ModelArtifact = bincode::deserialize_from(BufReader::new(file))?;
        artifact.validate(encoder_id)?;
        Ok(artifact)
    }

    pub fn validate(&self, encoder_id: &str) -> Result<(), ArtifactError> {
        let meta = &self.metadata;
        if meta.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ArtifactError::Incompatible(format!(
                "format version {} (expected {ARTIFACT_FORMAT_VERSION})",
                meta.format_version
            )));
        }
        if meta.feature_schema_version != FEATURE_SCHEMA_VERSION
            || meta.feature_names.len() != FEATURE_COUNT
            || meta.feature_names.iter().zip(FEATURE_NAMES).any(|(a, b)| a != b)
        {
            return Err(ArtifactError::Incompatible(format!(
                "feature schema v{} {:?} does not match v{FEATURE_SCHEMA_VERSION}",
                meta.feature_schema_version, meta.feature_names
            )));
        }
        if self.model.n_features() != FEATURE_COUNT {
            return Err(ArtifactError::Incompatible(format!(
                "model has {} inputs, expected {FEATURE_COUNT}",
                self.model.n_features()
            )));
        }
        if meta.encoder != encoder_id {
            return Err(ArtifactError::Incompatible(format!(
                "trained with encoder {}, serving with {encoder_id}",
                meta.encoder
            )));
        }
        Ok(())
    }
}
