//! CSV ingestion and export for delivery datasets.
//!
//! The upload path accepts plain CSV with a header row naming the five
//! required columns (extra columns are ignored). Fields are trimmed and
//! de-quoted; blank lines are skipped.

use crate::error::CoreError;
use crate::records::{DeliveryRecord, RawRecord, REQUIRED_COLUMNS};
use std::path::Path;

/// Parse CSV content into raw rows, validating the header.
pub fn parse_csv(content: &str) -> Result<Vec<RawRecord>, CoreError> {
    let mut lines = content.lines();
    let header = lines
        .next()
        .ok_or_else(|| CoreError::ingest("empty CSV input"))?;
    let columns: Vec<String> = header
        .split(',')
        .map(|s| s.trim().trim_matches('"').to_string())
        .collect();

    let index_of = |name: &str| -> Result<usize, CoreError> {
        columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| CoreError::MissingColumn(name.to_string()))
    };
    let zone_idx = index_of(REQUIRED_COLUMNS[0])?;
    let order_type_idx = index_of(REQUIRED_COLUMNS[1])?;
    let weather_idx = index_of(REQUIRED_COLUMNS[2])?;
    let traffic_idx = index_of(REQUIRED_COLUMNS[3])?;
    let delivery_time_idx = index_of(REQUIRED_COLUMNS[4])?;

    let mut rows = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(|s| s.trim().trim_matches('"')).collect();
        let field = |idx: usize| -> Option<String> {
            fields
                .get(idx)
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
        };
        rows.push(RawRecord {
            zone: field(zone_idx),
            order_type: field(order_type_idx),
            weather: field(weather_idx),
            traffic: field(traffic_idx),
            delivery_time: field(delivery_time_idx).and_then(|s| s.parse::<f64>().ok()),
        });
    }
    Ok(rows)
}

/// Read and parse a CSV file from disk.
pub fn read_csv_file(path: &Path) -> Result<Vec<RawRecord>, CoreError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CoreError::ingest(format!("failed to read {}: {e}", path.display())))?;
    parse_csv(&content)
}

/// Render records back to CSV (header + one line per record).
pub fn to_csv(records: &[DeliveryRecord]) -> String {
    let mut out = String::from("zone,order_type,weather,traffic,delivery_time\n");
    for record in records {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            record.zone, record.order_type, record.weather, record.traffic, record.delivery_time
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::filter_usable;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_valid_csv() {
        let csv = "zone,order_type,weather,traffic,delivery_time\n\
                   San Salvador,express,sunny,low,30\n\
                   \n\
                   Santa Ana,standard,rainy,high,52.5\n";
        let rows = parse_csv(csv).unwrap();
        assert_eq!(rows.len(), 2);
        let usable = filter_usable(rows);
        assert_eq!(usable.len(), 2);
        assert_eq!(usable[1].delivery_time, 52.5);
    }

    #[test]
    fn test_missing_column_rejected() {
        let csv = "zone,order_type,weather,delivery_time\nA,X,sunny,30\n";
        let err = parse_csv(csv).unwrap_err();
        assert!(matches!(err, CoreError::MissingColumn(ref c) if c == "traffic"));
    }

    #[test]
    fn test_empty_and_unparseable_fields_become_null() {
        let csv = "zone,order_type,weather,traffic,delivery_time\n\
                   San Miguel,express,sunny,low,not-a-number\n\
                   ,express,cloudy,medium,40\n";
        let rows = parse_csv(csv).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].delivery_time.is_none());
        assert!(rows[1].zone.is_none());
        assert!(filter_usable(rows).is_empty());
    }

    #[test]
    fn test_extra_columns_ignored() {
        let csv = "courier,zone,order_type,weather,traffic,delivery_time\n\
                   c-17,La Libertad,standard,cloudy,medium,41\n";
        let rows = parse_csv(csv).unwrap();
        let usable = filter_usable(rows);
        assert_eq!(usable.len(), 1);
        assert_eq!(usable[0].zone, "La Libertad");
    }

    #[test]
    fn test_export_round_trip() {
        let records = vec![DeliveryRecord {
            zone: "San Salvador".into(),
            order_type: "express".into(),
            weather: "sunny".into(),
            traffic: "low".into(),
            delivery_time: 30.0,
        }];
        let csv = to_csv(&records);
        let reparsed = filter_usable(parse_csv(&csv).unwrap());
        assert_eq!(reparsed, records);
    }
}
