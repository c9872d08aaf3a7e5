//! One-hot encoding of categorical delivery attributes.
//!
//! The encoder is fitted on the distinct values observed in the
//! training set only. Every later row, including the single-row query
//! at prediction time, is encoded directly against the fitted column
//! list: a value with no matching column contributes nothing (the
//! all-zero fallback), and no new columns are ever invented. This is
//! the reindex-against-training-columns step the pipeline depends on.

use chivofast_core::DeliveryRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The categorical fields fed to the regressor, in column order.
const FIELDS: [&str; 4] = ["zone", "order_type", "weather", "traffic"];

/// A fitted one-hot encoder holding the ordered training column set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    columns: Vec<String>,
}

impl OneHotEncoder {
    /// Fit the encoder on the distinct values observed in `records`.
    ///
    /// Columns are named `field=value` and ordered by field, then
    /// lexicographically by value, so the layout is a deterministic
    /// function of the training set's content.
    pub fn fit(records: &[DeliveryRecord]) -> Self {
        let mut values: [BTreeSet<&str>; 4] = Default::default();
        for record in records {
            values[0].insert(&record.zone);
            values[1].insert(&record.order_type);
            values[2].insert(&record.weather);
            values[3].insert(&record.traffic);
        }
        let mut columns = Vec::new();
        for (field, observed) in FIELDS.iter().zip(values.iter()) {
            for value in observed {
                columns.push(format!("{field}={value}"));
            }
        }
        Self { columns }
    }

    /// The ordered training column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Encode one labeled training record.
    pub fn encode_record(&self, record: &DeliveryRecord) -> Vec<f64> {
        self.encode_values(
            &record.zone,
            &record.order_type,
            &record.weather,
            &record.traffic,
        )
    }

    /// Encode one row of raw attribute values against the fitted
    /// columns. Values never seen during fitting set no column; for the
    /// open-vocabulary fields this is the documented zero-encoding
    /// fallback, surfaced as a warning rather than an error.
    pub fn encode_values(
        &self,
        zone: &str,
        order_type: &str,
        weather: &str,
        traffic: &str,
    ) -> Vec<f64> {
        let mut row = vec![0.0; self.columns.len()];
        for (field, value) in FIELDS.iter().zip([zone, order_type, weather, traffic]) {
            let name = format!("{field}={value}");
            match self.columns.iter().position(|c| *c == name) {
                Some(i) => row[i] = 1.0,
                None => {
                    tracing::warn!(
                        field,
                        value,
                        "value not observed during training, encoding as all zeros"
                    );
                }
            }
        }
        row
    }
}
