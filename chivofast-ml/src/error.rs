//! Error types for the chivofast-ml crate.

use thiserror::Error;

/// Top-level error type for estimation operations.
#[derive(Debug, Error)]
pub enum EstimatorError {
    /// Fewer than two usable rows remain after null filtering; the
    /// train/held-out split needs at least one row on each side.
    #[error("Insufficient training data: {usable} usable rows, need at least {required}")]
    InsufficientData { usable: usize, required: usize },

    /// A query condition falls outside the closed adjustment tables.
    #[error("Unknown {field} condition: {value}")]
    UnknownCondition { field: &'static str, value: String },

    /// A required field is absent from an input record.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Training error: {0}")]
    Training(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl EstimatorError {
    pub fn unknown_condition(field: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownCondition {
            field,
            value: value.into(),
        }
    }

    pub fn training(msg: impl Into<String>) -> Self {
        Self::Training(msg.into())
    }
}
