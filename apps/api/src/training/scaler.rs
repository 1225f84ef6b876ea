use serde::{Deserialize, Serialize};

use crate::matching::features::{FeatureVector, FEATURE_COUNT};

/// Per-feature standardization, `(x - mean) / std` with population std.
/// A constant column gets std 1 so it maps to 0 instead of NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: [f64; FEATURE_COUNT],
    pub std: [f64; FEATURE_COUNT],
}

impl StandardScaler {
    pub fn fit(rows: &[FeatureVector]) -> Self {
        let mut mean = [0.0; FEATURE_COUNT];
        let mut std = [1.0; FEATURE_COUNT];
        if rows.is_empty() {
            return Self { mean, std };
        }

        let n = rows.len() as f64;
        for j in 0..FEATURE_COUNT {
            let m = rows.iter().map(|r| r[j]).sum::<f64>() / n;
            let var = rows.iter().map(|r| (r[j] - m).powi(2)).sum::<f64>() / n;
            let s = var.sqrt();
            mean[j] = m;
            std[j] = if s > f64::EPSILON && s.is_finite() { s } else { 1.0 };
        }
        Self { mean, std }
    }

    pub fn transform(&self, row: &FeatureVector) -> FeatureVector {
        let mut out = [0.0; FEATURE_COUNT];
        for (j, v) in out.iter_mut().enumerate() {
            *v = (row[j] - self.mean[j]) / self.std[j];
        }
        out
    }

    pub fn transform_all(&self, rows: &[FeatureVector]) -> Vec<FeatureVector> {
        rows.iter().map(|r| self.transform(r)).collect()
    }
}
