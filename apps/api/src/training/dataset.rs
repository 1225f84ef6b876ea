//! Dataset table: CSV rows of `resume_text,job_title,match_score`.

use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use crate::models::training::TrainingExample;
use crate::training::storage::write_atomically;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("dataset CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Loads the rows fit for training. A missing file is an empty dataset; rows
/// with an out-of-range score are skipped with a warning.
pub fn load_dataset(path: &Path) -> Result<Vec<TrainingExample>, DatasetError> {
    Ok(valid_rows(&read_dataset(path)?))
}

/// Every row in the file as written, out-of-range scores included.
pub fn read_dataset(path: &Path) -> Result<Vec<TrainingExample>, DatasetError> {
    if !path.exists() {
        info!("Dataset {} not found, starting empty", path.display());
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader
        .deserialize::<TrainingExample>()
        .collect::<Result<Vec<_>, _>>()?;
    info!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

pub fn valid_rows(rows: &[TrainingExample]) -> Vec<TrainingExample> {
    let valid: Vec<TrainingExample> = rows
        .iter()
        .filter(|r| r.has_valid_score())
        .cloned()
        .collect();
    let skipped = rows.len() - valid.len();
    if skipped > 0 {
        warn!("Skipped {skipped} dataset rows with match_score outside [0, 100]");
    }
    valid
}

/// Replaces the dataset file atomically.
pub fn save_dataset(path: &Path, rows: &[TrainingExample]) -> Result<(), DatasetError> {
    write_atomically(path, |out| {
        let mut writer = csv::Writer::from_writer(out);
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok::<(), DatasetError>(())
    })
}
