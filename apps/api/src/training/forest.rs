//! Random Forest Regressor: bagged CART regression trees.
//!
//! Each tree is grown on a bootstrap sample, splitting on whichever feature
//! and threshold reduces squared error the most. Trees live in a flat node
//! arena so the whole forest serializes as plain data.
//!
//! Feature importances are the per-tree normalized error reductions averaged
//! over the forest, so they sum to 1 whenever any split was made.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 300,
            max_depth: 15,
            min_samples_split: 4,
            seed: 42,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ForestError {
    #[error("cannot fit on an empty training set")]
    EmptyTrainingSet,

    #[error("{rows} feature rows but {targets} targets")]
    LengthMismatch { rows: usize, targets: usize },

    #[error("row {row} has {actual} features, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("training data contains NaN or infinite values")]
    NonFinite,

    #[error("model expects {expected} features, got {actual}")]
    FeatureShape { expected: usize, actual: usize },
}

// ────────────────────────────────────────────
// Tree
// ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    fn predict(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

struct Split {
    feature: usize,
    threshold: f64,
    gain: f64,
}

/// Grows one tree and tracks the error reduction credited to each feature.
struct TreeBuilder<'a, R> {
    x: &'a [R],
    y: &'a [f64],
    max_depth: usize,
    min_samples_split: usize,
    nodes: Vec<Node>,
    gains: Vec<f64>,
}

impl<'a, R: AsRef<[f64]>> TreeBuilder<'a, R> {
    fn new(x: &'a [R], y: &'a [f64], n_features: usize, config: &ForestConfig) -> Self {
        Self {
            x,
            y,
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split.max(2),
            nodes: Vec::new(),
            gains: vec![0.0; n_features],
        }
    }

    fn build(mut self, mut indices: Vec<usize>) -> (RegressionTree, Vec<f64>) {
        self.grow(&mut indices, 0);
        (RegressionTree { nodes: self.nodes }, self.gains)
    }

    fn grow(&mut self, indices: &mut [usize], depth: usize) -> usize {
        let id = self.nodes.len();
        let value = indices.iter().map(|&i| self.y[i]).sum::<f64>() / indices.len().max(1) as f64;
        self.nodes.push(Node::Leaf { value });

        if depth >= self.max_depth || indices.len() < self.min_samples_split {
            return id;
        }
        let Some(split) = self.best_split(indices) else {
            return id;
        };

        let (mut left, mut right): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| self.x[i].as_ref()[split.feature] <= split.threshold);
        if left.is_empty() || right.is_empty() {
            return id;
        }

        self.gains[split.feature] += split.gain;
        let left_id = self.grow(&mut left, depth + 1);
        let right_id = self.grow(&mut right, depth + 1);
        self.nodes[id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left: left_id,
            right: right_id,
        };
        id
    }

    /// Exhaustive search over every feature and every midpoint between
    /// consecutive distinct values.
    fn best_split(&self, indices: &[usize]) -> Option<Split> {
        let n = indices.len();
        let total_sum: f64 = indices.iter().map(|&i| self.y[i]).sum();
        let total_sq: f64 = indices.iter().map(|&i| self.y[i] * self.y[i]).sum();
        let parent_sse = total_sq - total_sum * total_sum / n as f64;
        if parent_sse <= 1e-12 {
            return None;
        }

        let mut best: Option<Split> = None;
        let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(n);

        for feature in 0..self.gains.len() {
            pairs.clear();
            pairs.extend(indices.iter().map(|&i| (self.x[i].as_ref()[feature], self.y[i])));
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for k in 1..n {
                let (prev_x, prev_y) = pairs[k - 1];
                left_sum += prev_y;
                left_sq += prev_y * prev_y;

                let next_x = pairs[k].0;
                if prev_x == next_x {
                    continue;
                }

                let left_n = k as f64;
                let right_n = (n - k) as f64;
                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let sse = (left_sq - left_sum * left_sum / left_n)
                    + (right_sq - right_sum * right_sum / right_n);
                let gain = parent_sse - sse;

                if gain > 1e-12 && best.as_ref().map_or(true, |b| gain > b.gain) {
                    let mid = (prev_x + next_x) / 2.0;
                    let threshold = if mid < next_x { mid } else { prev_x };
                    best = Some(Split {
                        feature,
                        threshold,
                        gain,
                    });
                }
            }
        }
        best
    }
}

// ────────────────────────────────────────────
// Forest
// ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    trees: Vec<RegressionTree>,
    n_features: usize,
    importances: Vec<f64>,
}

impl RandomForestRegressor {
    pub fn fit<R: AsRef<[f64]>>(
        x: &[R],
        y: &[f64],
        config: &ForestConfig,
    ) -> Result<Self, ForestError> {
        if x.is_empty() {
            return Err(ForestError::EmptyTrainingSet);
        }
        if x.len() != y.len() {
            return Err(ForestError::LengthMismatch {
                rows: x.len(),
                targets: y.len(),
            });
        }

        let n_features = x[0].as_ref().len();
        for (row, values) in x.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != n_features {
                return Err(ForestError::RaggedRow {
                    row,
                    expected: n_features,
                    actual: values.len(),
                });
            }
            if values.iter().any(|v| !v.is_finite()) {
                return Err(ForestError::NonFinite);
            }
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(ForestError::NonFinite);
        }

        let n = x.len();
        let n_trees = config.n_trees.max(1);
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut trees = Vec::with_capacity(n_trees);
        let mut importances = vec![0.0; n_features];

        for _ in 0..n_trees {
            let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            let (tree, gains) = TreeBuilder::new(x, y, n_features, config).build(sample);

            let total: f64 = gains.iter().sum();
            if total > 0.0 {
                for (acc, g) in importances.iter_mut().zip(&gains) {
                    *acc += g / total;
                }
            }
            trees.push(tree);
        }

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            importances.iter_mut().for_each(|v| *v /= total);
        }

        Ok(Self {
            trees,
            n_features,
            importances,
        })
    }

    /// Mean of the per-tree predictions.
    pub fn predict(&self, row: &[f64]) -> Result<f64, ForestError> {
        if row.len() != self.n_features {
            return Err(ForestError::FeatureShape {
                expected: self.n_features,
                actual: row.len(),
            });
        }
        let sum: f64 = self.trees.iter().map(|t| t.predict(row)).sum();
        Ok(sum / self.trees.len().max(1) as f64)
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn feature_importances(&self) -> &[f64] {
        &self.importances
    }
}

/// Coefficient of determination. A constant target scores 1 when predicted
/// exactly and 0 otherwise.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let n = y_true.len().min(y_pred.len());
    if n == 0 {
        return 0.0;
    }
    let mean = y_true[..n].iter().sum::<f64>() / n as f64;
    let ss_tot: f64 = y_true[..n].iter().map(|v| (v - mean).powi(2)).sum();
    let ss_res: f64 = y_true[..n]
        .iter()
        .zip(&y_pred[..n])
        .map(|(t, p)| (t - p).powi(2))
        .sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}
