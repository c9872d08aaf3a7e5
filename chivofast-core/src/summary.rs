//! KPI summaries over stored delivery records.

use crate::records::DeliveryRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate statistics for the delivery-time column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryTimeSummary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub total: f64,
}

/// The KPI report shown by the dashboard: record count, delivery-time
/// aggregates, and value counts for each categorical column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiReport {
    pub total_records: usize,
    pub delivery_time: Option<DeliveryTimeSummary>,
    pub zone_counts: BTreeMap<String, usize>,
    pub order_type_counts: BTreeMap<String, usize>,
    pub weather_counts: BTreeMap<String, usize>,
    pub traffic_counts: BTreeMap<String, usize>,
}

/// Compute the KPI report for a record set.
pub fn summarize(records: &[DeliveryRecord]) -> KpiReport {
    let mut zone_counts = BTreeMap::new();
    let mut order_type_counts = BTreeMap::new();
    let mut weather_counts = BTreeMap::new();
    let mut traffic_counts = BTreeMap::new();

    let mut total = 0.0_f64;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for record in records {
        *zone_counts.entry(record.zone.clone()).or_insert(0) += 1;
        *order_type_counts
            .entry(record.order_type.clone())
            .or_insert(0) += 1;
        *weather_counts.entry(record.weather.clone()).or_insert(0) += 1;
        *traffic_counts.entry(record.traffic.clone()).or_insert(0) += 1;

        total += record.delivery_time;
        min = min.min(record.delivery_time);
        max = max.max(record.delivery_time);
    }

    let delivery_time = if records.is_empty() {
        None
    } else {
        Some(DeliveryTimeSummary {
            mean: total / records.len() as f64,
            min,
            max,
            total,
        })
    };

    KpiReport {
        total_records: records.len(),
        delivery_time,
        zone_counts,
        order_type_counts,
        weather_counts,
        traffic_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(zone: &str, weather: &str, minutes: f64) -> DeliveryRecord {
        DeliveryRecord {
            zone: zone.into(),
            order_type: "express".into(),
            weather: weather.into(),
            traffic: "low".into(),
            delivery_time: minutes,
        }
    }

    #[test]
    fn test_summarize() {
        let records = vec![
            record("San Salvador", "sunny", 30.0),
            record("San Salvador", "rainy", 50.0),
            record("Santa Ana", "sunny", 40.0),
        ];
        let report = summarize(&records);
        assert_eq!(report.total_records, 3);
        let dt = report.delivery_time.unwrap();
        assert_eq!(dt.mean, 40.0);
        assert_eq!(dt.min, 30.0);
        assert_eq!(dt.max, 50.0);
        assert_eq!(report.zone_counts["San Salvador"], 2);
        assert_eq!(report.weather_counts["sunny"], 2);
    }

    #[test]
    fn test_summarize_empty() {
        let report = summarize(&[]);
        assert_eq!(report.total_records, 0);
        assert!(report.delivery_time.is_none());
        assert!(report.zone_counts.is_empty());
    }
}
