//! The estimation session: train on historical records, predict for a
//! hypothetical new delivery.
//!
//! The session is an explicit, caller-owned context (the dashboard it
//! replaces kept the trained model in ambient session state). Each
//! `train` call refits from scratch; callers that want to skip
//! retraining on unchanged data use [`EstimatorSession::train_cached`],
//! which keys trained models by a SHA-256 fingerprint of the training
//! set's content.

use crate::adjust::AdjustmentFactors;
use crate::encoding::OneHotEncoder;
use crate::error::EstimatorError;
use crate::forest::{ForestConfig, ForestModel};
use crate::metrics::{TrainingMetrics, mean_absolute_error};
use crate::split::{DEFAULT_SEED, train_test_split};
use chivofast_core::DeliveryRecord;
use chivofast_core::config::FactorsConfig;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Minimum usable rows for a train/held-out split.
const MIN_TRAINING_ROWS: usize = 2;

/// Held-out fraction, matching the original pipeline's 80/20 split.
const TEST_FRACTION: f64 = 0.2;

/// Attributes of the hypothetical delivery to estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryQuery {
    pub zone: String,
    pub order_type: String,
    pub weather: String,
    pub traffic: String,
}

/// A finished estimate, echoing the query for the result sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Estimate {
    pub query: DeliveryQuery,
    /// Raw model output, in minutes. Not clipped; the model offers no
    /// non-negativity guarantee.
    pub base_minutes: f64,
    pub traffic_multiplier: f64,
    pub weather_multiplier: f64,
    /// `base_minutes * traffic_multiplier * weather_multiplier`.
    pub adjusted_minutes: f64,
}

/// A trained model plus everything needed to score new queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedEstimator {
    pub model: ForestModel,
    pub encoder: OneHotEncoder,
    pub metrics: TrainingMetrics,
    /// SHA-256 fingerprint of the training set this was fitted on.
    pub fingerprint: String,
}

impl TrainedEstimator {
    /// Base estimate for a query, before adjustment. Unseen zone or
    /// order_type values zero-encode (logged by the encoder) instead
    /// of erroring.
    pub fn base_estimate(&self, query: &DeliveryQuery) -> f64 {
        let row = self.encoder.encode_values(
            &query.zone,
            &query.order_type,
            &query.weather,
            &query.traffic,
        );
        self.model.predict(&row)
    }
}

/// Caller-owned estimation context.
pub struct EstimatorSession {
    factors: AdjustmentFactors,
    forest: ForestConfig,
    split_seed: u64,
    cache: HashMap<String, TrainedEstimator>,
}

impl Default for EstimatorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EstimatorSession {
    pub fn new() -> Self {
        Self {
            factors: AdjustmentFactors::default(),
            forest: ForestConfig::default(),
            split_seed: DEFAULT_SEED,
            cache: HashMap::new(),
        }
    }

    /// Session using configured factor overrides (the config must have
    /// been validated for category coverage at load time).
    pub fn with_factors(factors_config: &FactorsConfig) -> Self {
        Self {
            factors: AdjustmentFactors::from_config(factors_config),
            ..Self::new()
        }
    }

    pub fn factors(&self) -> &AdjustmentFactors {
        &self.factors
    }

    /// Train a fresh model on the given records.
    ///
    /// Records must already be null-filtered
    /// (`chivofast_core::filter_usable`); fewer than two rows cannot
    /// populate both sides of the split.
    pub fn train(&self, records: &[DeliveryRecord]) -> Result<TrainedEstimator, EstimatorError> {
        if records.len() < MIN_TRAINING_ROWS {
            return Err(EstimatorError::InsufficientData {
                usable: records.len(),
                required: MIN_TRAINING_ROWS,
            });
        }

        let encoder = OneHotEncoder::fit(records);
        let matrix: Vec<Vec<f64>> = records.iter().map(|r| encoder.encode_record(r)).collect();
        let targets: Vec<f64> = records.iter().map(|r| r.delivery_time).collect();

        let split = train_test_split(records.len(), TEST_FRACTION, self.split_seed);
        let train_x: Vec<Vec<f64>> = split.train.iter().map(|&i| matrix[i].clone()).collect();
        let train_y: Vec<f64> = split.train.iter().map(|&i| targets[i]).collect();

        let model = ForestModel::fit(&train_x, &train_y, &self.forest)?;

        let predicted: Vec<f64> = split.test.iter().map(|&i| model.predict(&matrix[i])).collect();
        let actual: Vec<f64> = split.test.iter().map(|&i| targets[i]).collect();
        let mae = mean_absolute_error(&predicted, &actual);

        let metrics = TrainingMetrics {
            mae,
            train_rows: split.train.len(),
            test_rows: split.test.len(),
            feature_columns: encoder.width(),
        };
        tracing::info!(
            mae = metrics.mae,
            train_rows = metrics.train_rows,
            test_rows = metrics.test_rows,
            "trained delivery-time model"
        );

        Ok(TrainedEstimator {
            model,
            encoder,
            metrics,
            fingerprint: fingerprint(records),
        })
    }

    /// Train, reusing a cached model when the training set's
    /// fingerprint matches a previous call.
    pub fn train_cached(
        &mut self,
        records: &[DeliveryRecord],
    ) -> Result<&TrainedEstimator, EstimatorError> {
        let key = fingerprint(records);
        if !self.cache.contains_key(&key) {
            let trained = self.train(records)?;
            self.cache.insert(key.clone(), trained);
        } else {
            tracing::debug!(fingerprint = %key, "reusing cached model");
        }
        Ok(&self.cache[&key])
    }

    /// Estimate the delivery time for a query: base model output times
    /// the traffic and weather multipliers. The condition values are
    /// validated against the closed sets before any scoring happens.
    pub fn predict(
        &self,
        trained: &TrainedEstimator,
        query: &DeliveryQuery,
    ) -> Result<Estimate, EstimatorError> {
        let traffic_multiplier = self.factors.traffic_multiplier(&query.traffic)?;
        let weather_multiplier = self.factors.weather_multiplier(&query.weather)?;

        let base_minutes = trained.base_estimate(query);
        Ok(Estimate {
            query: query.clone(),
            base_minutes,
            traffic_multiplier,
            weather_multiplier,
            adjusted_minutes: base_minutes * traffic_multiplier * weather_multiplier,
        })
    }
}

/// SHA-256 fingerprint over the canonical serialization of a record
/// set. Order-sensitive: the same rows in a different order are a
/// different training set for caching purposes.
pub fn fingerprint(records: &[DeliveryRecord]) -> String {
    let mut hasher = Sha256::new();
    for record in records {
        // Struct field order is stable, so this is canonical.
        hasher.update(serde_json::to_vec(record).unwrap_or_default());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        zone: &str,
        order_type: &str,
        weather: &str,
        traffic: &str,
        minutes: f64,
    ) -> DeliveryRecord {
        DeliveryRecord {
            zone: zone.into(),
            order_type: order_type.into(),
            weather: weather.into(),
            traffic: traffic.into(),
            delivery_time: minutes,
        }
    }

    fn varied_records() -> Vec<DeliveryRecord> {
        vec![
            record("San Salvador", "express", "sunny", "low", 30.0),
            record("San Salvador", "express", "rainy", "high", 50.0),
            record("San Salvador", "standard", "cloudy", "medium", 44.0),
            record("Santa Ana", "express", "sunny", "low", 38.0),
            record("Santa Ana", "standard", "rainy", "high", 65.0),
            record("Santa Ana", "standard", "sunny", "medium", 47.0),
            record("San Miguel", "express", "cloudy", "low", 41.0),
            record("San Miguel", "standard", "rainy", "medium", 58.0),
            record("La Libertad", "express", "sunny", "high", 45.0),
            record("La Libertad", "standard", "cloudy", "low", 39.0),
            record("La Libertad", "express", "rainy", "medium", 52.0),
            record("San Miguel", "standard", "sunny", "high", 49.0),
        ]
    }

    fn query(zone: &str, weather: &str, traffic: &str) -> DeliveryQuery {
        DeliveryQuery {
            zone: zone.into(),
            order_type: "express".into(),
            weather: weather.into(),
            traffic: traffic.into(),
        }
    }

    #[test]
    fn test_insufficient_data() {
        let session = EstimatorSession::new();
        for records in [vec![], varied_records()[..1].to_vec()] {
            let err = session.train(&records).unwrap_err();
            assert!(matches!(
                err,
                EstimatorError::InsufficientData { required: 2, .. }
            ));
        }
    }

    #[test]
    fn test_training_is_deterministic() {
        let session = EstimatorSession::new();
        let records = varied_records();
        let a = session.train(&records).unwrap();
        let b = session.train(&records).unwrap();
        assert_eq!(a.metrics, b.metrics);

        let q = query("San Salvador", "sunny", "low");
        assert_eq!(
            session.predict(&a, &q).unwrap().adjusted_minutes,
            session.predict(&b, &q).unwrap().adjusted_minutes
        );
    }

    #[test]
    fn test_end_to_end_estimate() {
        let session = EstimatorSession::new();
        let trained = session.train(&varied_records()).unwrap();
        assert!(trained.metrics.mae >= 0.0);
        assert_eq!(
            trained.metrics.train_rows + trained.metrics.test_rows,
            varied_records().len()
        );

        let estimate = session
            .predict(&trained, &query("San Salvador", "sunny", "low"))
            .unwrap();
        assert_eq!(estimate.traffic_multiplier, 1.0);
        assert_eq!(estimate.weather_multiplier, 1.0);
        assert_eq!(estimate.adjusted_minutes, estimate.base_minutes);
    }

    #[test]
    fn test_adjustment_is_pure_multiplication() {
        let session = EstimatorSession::new();
        let trained = session.train(&varied_records()).unwrap();

        let neutral = session
            .predict(&trained, &query("Santa Ana", "sunny", "low"))
            .unwrap();
        let medium = session
            .predict(&trained, &query("Santa Ana", "sunny", "medium"))
            .unwrap();
        assert_eq!(medium.adjusted_minutes, 1.15 * medium.base_minutes);

        // Holding weather neutral, the fully neutral query passes its
        // base estimate through untouched.
        assert_eq!(neutral.adjusted_minutes, neutral.base_minutes);
        let ratio = medium.adjusted_minutes / medium.base_minutes;
        assert!((ratio - 1.15).abs() < 1e-12);

        let worst = session
            .predict(&trained, &query("Santa Ana", "rainy", "high"))
            .unwrap();
        assert_eq!(worst.adjusted_minutes, worst.base_minutes * 1.3 * 1.25);
    }

    #[test]
    fn test_unknown_conditions_rejected() {
        let session = EstimatorSession::new();
        let trained = session.train(&varied_records()).unwrap();

        let err = session
            .predict(&trained, &query("San Salvador", "stormy", "low"))
            .unwrap_err();
        assert!(matches!(
            err,
            EstimatorError::UnknownCondition { field: "weather", .. }
        ));

        let err = session
            .predict(&trained, &query("San Salvador", "sunny", "jammed"))
            .unwrap_err();
        assert!(matches!(
            err,
            EstimatorError::UnknownCondition { field: "traffic", .. }
        ));
    }

    #[test]
    fn test_unseen_zone_falls_back_without_error() {
        let session = EstimatorSession::new();
        // Single zone in training; querying a different zone must not
        // error, it zero-encodes that field.
        let records: Vec<DeliveryRecord> = varied_records()
            .into_iter()
            .map(|mut r| {
                r.zone = "San Salvador".into();
                r
            })
            .collect();
        let trained = session.train(&records).unwrap();
        let estimate = session
            .predict(&trained, &query("Ahuachapán", "sunny", "low"))
            .unwrap();
        assert!(estimate.adjusted_minutes.is_finite());
    }

    #[test]
    fn test_cache_reuses_identical_training_set() {
        let mut session = EstimatorSession::new();
        let records = varied_records();
        let first = session.train_cached(&records).unwrap().fingerprint.clone();
        let second = session.train_cached(&records).unwrap().fingerprint.clone();
        assert_eq!(first, second);
        assert_eq!(session.cache.len(), 1);

        let mut reordered = varied_records();
        reordered.reverse();
        session.train_cached(&reordered).unwrap();
        assert_eq!(session.cache.len(), 2);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let records = varied_records();
        assert_eq!(fingerprint(&records), fingerprint(&records));
        let mut changed = varied_records();
        changed[0].delivery_time += 1.0;
        assert_ne!(fingerprint(&records), fingerprint(&changed));
    }
}
