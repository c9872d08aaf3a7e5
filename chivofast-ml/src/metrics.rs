//! Held-out evaluation metrics.

use serde::{Deserialize, Serialize};

/// Metrics reported by a training run. The MAE is informational only;
/// no control decision depends on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Mean absolute error on the held-out partition, in minutes.
    pub mae: f64,
    pub train_rows: usize,
    pub test_rows: usize,
    pub feature_columns: usize,
}

/// Mean absolute error between predictions and true values.
///
/// Callers must pass equally sized, non-empty slices.
pub fn mean_absolute_error(predicted: &[f64], actual: &[f64]) -> f64 {
    debug_assert_eq!(predicted.len(), actual.len());
    debug_assert!(!predicted.is_empty());
    let sum: f64 = predicted
        .iter()
        .zip(actual)
        .map(|(p, a)| (p - a).abs())
        .sum();
    sum / predicted.len() as f64
}
