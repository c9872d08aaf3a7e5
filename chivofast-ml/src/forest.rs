//! Seeded random-forest regressor.
//!
//! Bagged CART regression trees: each tree is grown to full depth on a
//! bootstrap resample, splits minimize the summed squared error of the
//! two children over all features, and a leaf predicts the mean target
//! of the rows that reached it. The ensemble prediction is the mean of
//! the per-tree predictions. All randomness flows from one seeded
//! generator, so a fixed seed and fixed input give identical trees on
//! every run.

use crate::error::EstimatorError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Hyperparameters for [`ForestModel::fit`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of bagged trees.
    #[serde(default = "default_n_trees")]
    pub n_trees: usize,
    /// Seed for bootstrap resampling.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Minimum rows required to attempt a split.
    #[serde(default = "default_min_samples_split")]
    pub min_samples_split: usize,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: default_n_trees(),
            seed: default_seed(),
            min_samples_split: default_min_samples_split(),
        }
    }
}

fn default_n_trees() -> usize {
    100
}
fn default_seed() -> u64 {
    crate::split::DEFAULT_SEED
}
fn default_min_samples_split() -> usize {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn predict(&self, row: &[f64]) -> f64 {
        match self {
            Node::Leaf { value } => *value,
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if row[*feature] <= *threshold {
                    left.predict(row)
                } else {
                    right.predict(row)
                }
            }
        }
    }
}

/// A fitted forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestModel {
    trees: Vec<Node>,
    n_features: usize,
}

impl ForestModel {
    /// Fit on a row-major feature matrix and target vector.
    pub fn fit(x: &[Vec<f64>], y: &[f64], config: &ForestConfig) -> Result<Self, EstimatorError> {
        if x.is_empty() || x.len() != y.len() {
            return Err(EstimatorError::training(format!(
                "feature matrix ({} rows) and targets ({} rows) must be non-empty and equal length",
                x.len(),
                y.len()
            )));
        }
        let n_features = x[0].len();
        let n_rows = x.len();
        let mut rng = StdRng::seed_from_u64(config.seed);

        let mut trees = Vec::with_capacity(config.n_trees);
        for _ in 0..config.n_trees {
            let sample: Vec<usize> = (0..n_rows).map(|_| rng.gen_range(0..n_rows)).collect();
            trees.push(build_tree(x, y, &sample, config.min_samples_split));
        }
        tracing::debug!(
            trees = trees.len(),
            rows = n_rows,
            features = n_features,
            "fitted forest"
        );
        Ok(Self { trees, n_features })
    }

    /// Predict one row, averaging over the ensemble.
    pub fn predict(&self, row: &[f64]) -> f64 {
        debug_assert_eq!(row.len(), self.n_features);
        let sum: f64 = self.trees.iter().map(|t| t.predict(row)).sum();
        sum / self.trees.len() as f64
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

/// Grow one tree over the given (possibly repeated) row indices.
fn build_tree(x: &[Vec<f64>], y: &[f64], indices: &[usize], min_samples_split: usize) -> Node {
    let mean = indices.iter().map(|&i| y[i]).sum::<f64>() / indices.len() as f64;
    if indices.len() < min_samples_split || is_constant(y, indices) {
        return Node::Leaf { value: mean };
    }

    let Some(best) = find_best_split(x, y, indices) else {
        return Node::Leaf { value: mean };
    };

    let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .partition(|&&i| x[i][best.feature] <= best.threshold);
    Node::Split {
        feature: best.feature,
        threshold: best.threshold,
        left: Box::new(build_tree(x, y, &left_idx, min_samples_split)),
        right: Box::new(build_tree(x, y, &right_idx, min_samples_split)),
    }
}

fn is_constant(y: &[f64], indices: &[usize]) -> bool {
    let first = y[indices[0]];
    indices.iter().all(|&i| y[i] == first)
}

struct BestSplit {
    feature: usize,
    threshold: f64,
}

/// Exhaustive search for the (feature, threshold) pair minimizing the
/// summed squared error of the two children. Thresholds are midpoints
/// between consecutive distinct feature values; ties keep the first
/// candidate encountered, which is deterministic because features and
/// sorted rows are scanned in a fixed order.
fn find_best_split(x: &[Vec<f64>], y: &[f64], indices: &[usize]) -> Option<BestSplit> {
    let n_features = x[indices[0]].len();
    let total: f64 = indices.iter().map(|&i| y[i]).sum();
    let total_sq: f64 = indices.iter().map(|&i| y[i] * y[i]).sum();
    let n = indices.len() as f64;
    let parent_sse = total_sq - total * total / n;

    let mut best: Option<(f64, BestSplit)> = None;
    let mut order: Vec<usize> = indices.to_vec();

    for feature in 0..n_features {
        order.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        for (k, &i) in order.iter().enumerate().take(order.len() - 1) {
            left_sum += y[i];
            left_sq += y[i] * y[i];

            let here = x[i][feature];
            let next = x[order[k + 1]][feature];
            if here == next {
                continue;
            }
            let left_n = (k + 1) as f64;
            let right_n = n - left_n;
            let right_sum = total - left_sum;
            let right_sq = total_sq - left_sq;
            let sse = (left_sq - left_sum * left_sum / left_n)
                + (right_sq - right_sum * right_sum / right_n);
            if best.as_ref().is_none_or(|(b, _)| sse < *b) {
                best = Some((
                    sse,
                    BestSplit {
                        feature,
                        threshold: (here + next) / 2.0,
                    },
                ));
            }
        }
    }

    match best {
        // A split that does not reduce error is not worth growing.
        Some((sse, split)) if sse < parent_sse => Some(split),
        _ => None,
    }
}
