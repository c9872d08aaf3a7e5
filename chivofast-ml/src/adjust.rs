//! Traffic and weather adjustment multipliers.
//!
//! Applied after the model's base estimate; these are operational
//! constants (optionally overridden via configuration), not learned
//! parameters. Lookups validate the raw query string against the
//! closed condition sets.

use crate::error::EstimatorError;
use chivofast_core::config::FactorsConfig;
use chivofast_core::{Traffic, Weather};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The multiplier tables, keyed by the closed condition enums.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentFactors {
    traffic: BTreeMap<Traffic, f64>,
    weather: BTreeMap<Weather, f64>,
}

impl Default for AdjustmentFactors {
    fn default() -> Self {
        Self::from_config(&FactorsConfig::default())
    }
}

impl AdjustmentFactors {
    /// Build from a [`FactorsConfig`]. Config loading already rejects
    /// partial tables (`ChivofastConfig::validate`); any category still
    /// absent falls back to its default multiplier so lookups stay
    /// total.
    pub fn from_config(config: &FactorsConfig) -> Self {
        let defaults = FactorsConfig::default();
        let mut traffic = defaults.traffic;
        traffic.extend(config.traffic.iter().map(|(k, v)| (*k, *v)));
        let mut weather = defaults.weather;
        weather.extend(config.weather.iter().map(|(k, v)| (*k, *v)));
        Self { traffic, weather }
    }

    /// Multiplier for a raw traffic string, rejecting values outside
    /// the closed set.
    pub fn traffic_multiplier(&self, value: &str) -> Result<f64, EstimatorError> {
        let traffic: Traffic = value
            .parse()
            .map_err(|_| EstimatorError::unknown_condition("traffic", value))?;
        Ok(self.traffic[&traffic])
    }

    /// Multiplier for a raw weather string, rejecting values outside
    /// the closed set.
    pub fn weather_multiplier(&self, value: &str) -> Result<f64, EstimatorError> {
        let weather: Weather = value
            .parse()
            .map_err(|_| EstimatorError::unknown_condition("weather", value))?;
        Ok(self.weather[&weather])
    }
}
