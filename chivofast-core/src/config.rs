//! Configuration types for the ChivoFast toolkit.

use crate::error::CoreError;
use crate::records::{Traffic, Weather};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Top-level configuration, loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChivofastConfig {
    /// Record store configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Adjustment multiplier overrides.
    #[serde(default)]
    pub factors: FactorsConfig,
}

/// Record store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("chivofast.db")
}

/// Multiplier tables applied after the model's base estimate.
///
/// These are operational constants, not learned parameters. An override
/// must cover every enumerated category; partial tables are rejected at
/// load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorsConfig {
    #[serde(default = "default_traffic_factors")]
    pub traffic: BTreeMap<Traffic, f64>,
    #[serde(default = "default_weather_factors")]
    pub weather: BTreeMap<Weather, f64>,
}

impl Default for FactorsConfig {
    fn default() -> Self {
        Self {
            traffic: default_traffic_factors(),
            weather: default_weather_factors(),
        }
    }
}

fn default_traffic_factors() -> BTreeMap<Traffic, f64> {
    BTreeMap::from([
        (Traffic::Low, 1.0),
        (Traffic::Medium, 1.15),
        (Traffic::High, 1.3),
    ])
}

fn default_weather_factors() -> BTreeMap<Weather, f64> {
    BTreeMap::from([
        (Weather::Sunny, 1.0),
        (Weather::Cloudy, 1.1),
        (Weather::Rainy, 1.25),
    ])
}

impl ChivofastConfig {
    /// Load configuration from a TOML file, falling back to defaults if
    /// the file does not exist.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate that the factor tables cover every enumerated category
    /// and that every multiplier is positive.
    pub fn validate(&self) -> Result<(), CoreError> {
        for traffic in Traffic::ALL {
            match self.factors.traffic.get(&traffic) {
                Some(m) if *m > 0.0 => {}
                Some(m) => {
                    return Err(CoreError::config(format!(
                        "traffic factor for '{traffic}' must be positive, got {m}"
                    )));
                }
                None => {
                    return Err(CoreError::config(format!(
                        "traffic factor table is missing '{traffic}'"
                    )));
                }
            }
        }
        for weather in Weather::ALL {
            match self.factors.weather.get(&weather) {
                Some(m) if *m > 0.0 => {}
                Some(m) => {
                    return Err(CoreError::config(format!(
                        "weather factor for '{weather}' must be positive, got {m}"
                    )));
                }
                None => {
                    return Err(CoreError::config(format!(
                        "weather factor table is missing '{weather}'"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = ChivofastConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.factors.traffic[&Traffic::Medium], 1.15);
        assert_eq!(config.factors.weather[&Weather::Rainy], 1.25);
    }

    #[test]
    fn test_partial_factor_table_rejected() {
        let mut config = ChivofastConfig::default();
        config.factors.weather.remove(&Weather::Cloudy);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cloudy"));
    }

    #[test]
    fn test_non_positive_multiplier_rejected() {
        let mut config = ChivofastConfig::default();
        config.factors.traffic.insert(Traffic::High, 0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_override_round_trip() {
        let toml_src = r#"
            [database]
            path = "deliveries.db"

            [factors.traffic]
            low = 1.0
            medium = 1.2
            high = 1.5

            [factors.weather]
            sunny = 1.0
            cloudy = 1.1
            rainy = 1.3
        "#;
        let config: ChivofastConfig = toml::from_str(toml_src).unwrap();
        config.validate().unwrap();
        assert_eq!(config.database.path, PathBuf::from("deliveries.db"));
        assert_eq!(config.factors.traffic[&Traffic::High], 1.5);
    }
}
