//! Delivery record types and the closed condition vocabularies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Column names every ingested dataset must provide.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "zone",
    "order_type",
    "weather",
    "traffic",
    "delivery_time",
];

/// Weather conditions the adjustment tables recognize.
///
/// Historical records may carry other weather strings (they still feed
/// the regression as categorical levels); only *queries* are restricted
/// to this closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    Sunny,
    Cloudy,
    Rainy,
}

impl Weather {
    pub const ALL: [Weather; 3] = [Weather::Sunny, Weather::Cloudy, Weather::Rainy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weather::Sunny => "sunny",
            Weather::Cloudy => "cloudy",
            Weather::Rainy => "rainy",
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weather {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sunny" => Ok(Weather::Sunny),
            "cloudy" => Ok(Weather::Cloudy),
            "rainy" => Ok(Weather::Rainy),
            other => Err(format!("unknown weather condition: {other}")),
        }
    }
}

/// Traffic levels the adjustment tables recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Traffic {
    Low,
    Medium,
    High,
}

impl Traffic {
    pub const ALL: [Traffic; 3] = [Traffic::Low, Traffic::Medium, Traffic::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Traffic::Low => "low",
            Traffic::Medium => "medium",
            Traffic::High => "high",
        }
    }
}

impl fmt::Display for Traffic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Traffic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Traffic::Low),
            "medium" => Ok(Traffic::Medium),
            "high" => Ok(Traffic::High),
            other => Err(format!("unknown traffic level: {other}")),
        }
    }
}

/// One historical delivery observation.
///
/// `zone` and `order_type` are open vocabularies; `weather` and
/// `traffic` are stored as the raw strings observed in the data so the
/// encoder sees exactly the levels the dataset contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub zone: String,
    pub order_type: String,
    pub weather: String,
    pub traffic: String,
    /// Target value, in minutes.
    pub delivery_time: f64,
}

/// A row as it arrives from ingestion, before null filtering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    pub zone: Option<String>,
    pub order_type: Option<String>,
    pub weather: Option<String>,
    pub traffic: Option<String>,
    pub delivery_time: Option<f64>,
}

impl RawRecord {
    /// Promote to a [`DeliveryRecord`] if every required field is present.
    pub fn into_usable(self) -> Option<DeliveryRecord> {
        Some(DeliveryRecord {
            zone: self.zone?,
            order_type: self.order_type?,
            weather: self.weather?,
            traffic: self.traffic?,
            delivery_time: self.delivery_time?,
        })
    }
}

/// Drop rows with any missing required field.
///
/// Mirrors the dashboard's `dropna()` before training: a record only
/// participates if all five fields are present.
pub fn filter_usable(rows: Vec<RawRecord>) -> Vec<DeliveryRecord> {
    let total = rows.len();
    let usable: Vec<DeliveryRecord> = rows.into_iter().filter_map(RawRecord::into_usable).collect();
    if usable.len() < total {
        tracing::debug!(
            dropped = total - usable.len(),
            kept = usable.len(),
            "dropped rows with null required fields"
        );
    }
    usable
}
