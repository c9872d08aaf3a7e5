//! # chivofast-ml — Delivery-Time Estimation Pipeline
//!
//! Trains a seeded random-forest regressor on one-hot encoded delivery
//! attributes (zone, order type, weather, traffic) and estimates the
//! duration of a hypothetical new delivery, applying fixed
//! multiplicative adjustments for traffic level and weather condition.
//!
//! The whole pipeline is deterministic for a fixed training set: the
//! 80/20 split and the bootstrap resampling both run off a fixed seed,
//! so repeated runs on identical input produce identical models,
//! metrics, and estimates.

pub mod adjust;
pub mod encoding;
pub mod error;
pub mod estimator;
pub mod forest;
pub mod metrics;
pub mod split;

pub use adjust::AdjustmentFactors;
pub use encoding::OneHotEncoder;
pub use error::EstimatorError;
pub use estimator::{DeliveryQuery, Estimate, EstimatorSession, TrainedEstimator, fingerprint};
pub use forest::{ForestConfig, ForestModel};
pub use metrics::{TrainingMetrics, mean_absolute_error};
