//! Trainer: dataset → fitted vectorizer, scaler and forest → persisted artifact.
//!
//! `train` is synchronous and CPU-bound; callers on the async runtime run it
//! through `spawn_blocking`. Nothing is written to `model_path` unless every
//! step before persistence succeeded.

use std::path::PathBuf;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{info, warn};

use crate::matching::features::{build_features, FeatureVector, FEATURE_NAMES};
use crate::matching::normalize::normalize;
use crate::matching::semantic::SemanticEncoder;
use crate::matching::vectorizer::{TfidfVectorizer, DEFAULT_MAX_FEATURES};
use crate::models::training::TrainingExample;
use crate::training::artifact::{ArtifactError, ModelArtifact, TrainingMetrics};
use crate::training::dataset::{read_dataset, save_dataset, valid_rows, DatasetError};
use crate::training::forest::{r2_score, ForestConfig, ForestError, RandomForestRegressor};
use crate::training::scaler::StandardScaler;
use crate::training::synthetic::SyntheticGenerator;

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("no training data available")]
    EmptyDataset,

    #[error("model fitting failed: {0}")]
    Model(#[from] ForestError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("training panicked: {0}")]
    Panicked(String),
}

#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub model_path: PathBuf,
    pub dataset_path: PathBuf,
    /// Below this many rows the dataset is topped up with synthetic examples.
    pub min_rows: usize,
    /// Size the dataset is topped up to.
    pub target_rows: usize,
    /// Seeds the synthetic generator and the train/test shuffle.
    pub seed: u64,
    pub forest: ForestConfig,
    pub max_features: usize,
    pub test_fraction: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("job_probability_model.bin"),
            dataset_path: PathBuf::from("job_dataset.csv"),
            min_rows: 500,
            target_rows: 600,
            seed: 42,
            forest: ForestConfig::default(),
            max_features: DEFAULT_MAX_FEATURES,
            test_fraction: 0.2,
        }
    }
}

pub struct Trainer {
    config: TrainingConfig,
    encoder: Arc<dyn SemanticEncoder>,
}

impl Trainer {
    pub fn new(config: TrainingConfig, encoder: Arc<dyn SemanticEncoder>) -> Self {
        Self { config, encoder }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn train(&self) -> Result<ModelArtifact, TrainingError> {
        let cfg = &self.config;
        let rows = self.prepare_dataset()?;
        if rows.is_empty() {
            return Err(TrainingError::EmptyDataset);
        }
        info!("Training on {} rows", rows.len());

        let corpus: Vec<String> = rows
            .iter()
            .map(|r| normalize(&r.resume_text))
            .chain(rows.iter().map(|r| normalize(&r.job_title)))
            .collect();
        let vectorizer = TfidfVectorizer::fit(&corpus, cfg.max_features);
        info!("Vectorizer vocabulary: {} terms", vectorizer.vocabulary_size());

        let features: Vec<FeatureVector> = rows
            .iter()
            .map(|r| {
                build_features(
                    &r.resume_text,
                    &r.job_title,
                    &vectorizer,
                    self.encoder.as_ref(),
                )
            })
            .collect();
        let targets: Vec<f64> = rows.iter().map(|r| r.match_score).collect();

        let scaler = StandardScaler::fit(&features);
        let scaled = scaler.transform_all(&features);

        let (train_idx, test_idx) = split_indices(scaled.len(), cfg.test_fraction, cfg.seed);
        let pick = |idx: &[usize]| -> (Vec<FeatureVector>, Vec<f64>) {
            (
                idx.iter().map(|&i| scaled[i]).collect(),
                idx.iter().map(|&i| targets[i]).collect(),
            )
        };
        let (x_train, y_train) = pick(&train_idx);
        let (x_test, y_test) = pick(&test_idx);

        let model = RandomForestRegressor::fit(&x_train, &y_train, &cfg.forest)?;
        info!(
            "Fitted {} trees on {} rows ({} held out)",
            model.n_trees(),
            x_train.len(),
            x_test.len()
        );

        let train_r2 = r2_score(&y_train, &predict_all(&model, &x_train)?);
        let test_r2 = if x_test.is_empty() {
            None
        } else {
            Some(r2_score(&y_test, &predict_all(&model, &x_test)?))
        };
        match test_r2 {
            Some(r2) => info!("Train R²: {train_r2:.4}, test R²: {r2:.4}"),
            None => info!("Train R²: {train_r2:.4} (too few rows for a test split)"),
        }

        let feature_importances: Vec<(String, f64)> = FEATURE_NAMES
            .iter()
            .zip(model.feature_importances())
            .map(|(name, imp)| (name.to_string(), *imp))
            .collect();
        for (name, imp) in &feature_importances {
            info!("  importance {name}: {imp:.4}");
        }

        let metrics = TrainingMetrics {
            rows: rows.len(),
            train_rows: x_train.len(),
            test_rows: x_test.len(),
            train_r2,
            test_r2,
            feature_importances,
        };
        let artifact = ModelArtifact::new(self.encoder.id(), metrics, vectorizer, scaler, model);
        artifact.save(&cfg.model_path)?;
        info!("Model saved to {}", cfg.model_path.display());

        Ok(artifact)
    }

    /// Loads the dataset and tops it up with synthetic rows when it is too
    /// small, persisting the augmented table. Rows skipped for an
    /// out-of-range score stay in the persisted table.
    fn prepare_dataset(&self) -> Result<Vec<TrainingExample>, TrainingError> {
        let cfg = &self.config;
        let mut table = read_dataset(&cfg.dataset_path)?;
        let mut rows = valid_rows(&table);

        if rows.len() < cfg.min_rows {
            let missing = cfg.target_rows.saturating_sub(rows.len());
            if missing > 0 {
                warn!(
                    "Dataset has {} rows (< {}), generating {missing} synthetic examples",
                    rows.len(),
                    cfg.min_rows
                );
                let synthetic = SyntheticGenerator::with_seed(cfg.seed).generate(missing);
                rows.extend(synthetic.iter().cloned());
                table.extend(synthetic);
                save_dataset(&cfg.dataset_path, &table)?;
            }
        }
        Ok(rows)
    }
}

fn predict_all(
    model: &RandomForestRegressor,
    rows: &[FeatureVector],
) -> Result<Vec<f64>, ForestError> {
    rows.iter().map(|r| model.predict(r)).collect()
}

/// Seeded shuffle, then `ceil(n * test_fraction)` rows held out. If that would
/// leave nothing to train on, everything trains and the test split is empty.
fn split_indices(n: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut idx: Vec<usize> = (0..n).collect();
    idx.shuffle(&mut StdRng::seed_from_u64(seed));

    let test_n = ((n as f64) * test_fraction.clamp(0.0, 1.0)).ceil() as usize;
    if test_n == 0 || test_n >= n {
        return (idx, Vec::new());
    }
    let test = idx.split_off(n - test_n);
    (idx, test)
}
