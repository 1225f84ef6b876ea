use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::training::forest::ForestConfig;
use crate::training::TrainingConfig;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub model_path: PathBuf,
    pub dataset_path: PathBuf,
    /// Retrain at startup even when a model artifact exists.
    pub force_retrain: bool,
    pub min_dataset_rows: usize,
    pub synthetic_target_rows: usize,
    pub training_seed: u64,
    pub forest_trees: usize,
    pub forest_max_depth: usize,
    pub forest_min_samples_split: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            port: parse(&var("PORT", "8080"), "PORT must be a valid port number")?,
            rust_log: var("RUST_LOG", "info"),
            model_path: PathBuf::from(var("MODEL_PATH", "job_probability_model.bin")),
            dataset_path: PathBuf::from(var("DATASET_PATH", "job_dataset.csv")),
            force_retrain: parse_flag(&var("FORCE_RETRAIN", "false"))
                .context("FORCE_RETRAIN must be true or false")?,
            min_dataset_rows: parse(
                &var("MIN_DATASET_ROWS", "500"),
                "MIN_DATASET_ROWS must be a non-negative integer",
            )?,
            synthetic_target_rows: parse(
                &var("SYNTHETIC_TARGET_ROWS", "600"),
                "SYNTHETIC_TARGET_ROWS must be a non-negative integer",
            )?,
            training_seed: parse(
                &var("TRAINING_SEED", "42"),
                "TRAINING_SEED must be an unsigned integer",
            )?,
            forest_trees: parse(
                &var("FOREST_TREES", "300"),
                "FOREST_TREES must be a positive integer",
            )?,
            forest_max_depth: parse(
                &var("FOREST_MAX_DEPTH", "15"),
                "FOREST_MAX_DEPTH must be a non-negative integer",
            )?,
            forest_min_samples_split: parse(
                &var("FOREST_MIN_SAMPLES_SPLIT", "4"),
                "FOREST_MIN_SAMPLES_SPLIT must be a non-negative integer",
            )?,
        })
    }

    pub fn training_config(&self) -> TrainingConfig {
        TrainingConfig {
            model_path: self.model_path.clone(),
            dataset_path: self.dataset_path.clone(),
            min_rows: self.min_dataset_rows,
            target_rows: self.synthetic_target_rows,
            seed: self.training_seed,
            forest: ForestConfig {
                n_trees: self.forest_trees,
                max_depth: self.forest_max_depth,
                min_samples_split: self.forest_min_samples_split,
                seed: self.training_seed,
            },
            ..TrainingConfig::default()
        }
    }
}

fn parse<T>(raw: &str, message: &'static str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim().parse::<T>().context(message)
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("unrecognized flag value '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.model_path, PathBuf::from("job_probability_model.bin"));
        assert_eq!(config.dataset_path, PathBuf::from("job_dataset.csv"));
        assert!(!config.force_retrain);
        assert_eq!(config.min_dataset_rows, 500);
        assert_eq!(config.synthetic_target_rows, 600);
        assert_eq!(config.training_seed, 42);
        assert_eq!(config.forest_trees, 300);
        assert_eq!(config.forest_max_depth, 15);
        assert_eq!(config.forest_min_samples_split, 4);
    }

    #[test]
    fn test_overrides_flow_into_training_config() {
        let config = config_from(&[
            ("FORCE_RETRAIN", "TRUE"),
            ("TRAINING_SEED", "7"),
            ("FOREST_TREES", "50"),
            ("MODEL_PATH", "/tmp/m.bin"),
        ])
        .unwrap();
        assert!(config.force_retrain);

        let training = config.training_config();
        assert_eq!(training.seed, 7);
        assert_eq!(training.forest.seed, 7);
        assert_eq!(training.forest.n_trees, 50);
        assert_eq!(training.model_path, PathBuf::from("/tmp/m.bin"));
    }

    #[test]
    fn test_invalid_values_fail_with_context() {
        let err = config_from(&[("PORT", "not-a-port")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));

        let err = config_from(&[("FOREST_TREES", "-3")]).unwrap_err();
        assert!(err.to_string().contains("FOREST_TREES"));

        assert!(config_from(&[("FORCE_RETRAIN", "maybe")]).is_err());
    }
}
