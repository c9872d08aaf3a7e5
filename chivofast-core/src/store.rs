//! SQLite-backed delivery record store.
//!
//! Replaces the dashboard's ad-hoc `excel_data` table with a fixed
//! schema for the five required delivery fields plus an ingestion
//! timestamp.

use crate::error::CoreError;
use crate::records::DeliveryRecord;
use chrono::Utc;
use rusqlite::Connection;
use std::path::Path;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS deliveries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    zone TEXT NOT NULL,
    order_type TEXT NOT NULL,
    weather TEXT NOT NULL,
    traffic TEXT NOT NULL,
    delivery_time REAL NOT NULL,
    ingested_at TEXT NOT NULL
)";

/// Handle to the delivery record table.
pub struct DeliveryStore {
    conn: Connection,
}

impl DeliveryStore {
    /// Open (or create) the store at the given path.
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        let conn = Connection::open(path)?;
        conn.execute(SCHEMA, [])?;
        Ok(Self { conn })
    }

    /// In-memory store, used by tests and dry runs.
    pub fn open_in_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute(SCHEMA, [])?;
        Ok(Self { conn })
    }

    /// Append records, returning the number of rows inserted.
    pub fn append(&mut self, records: &[DeliveryRecord]) -> Result<usize, CoreError> {
        let ingested_at = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO deliveries
                 (zone, order_type, weather, traffic, delivery_time, ingested_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for record in records {
                stmt.execute(rusqlite::params![
                    record.zone,
                    record.order_type,
                    record.weather,
                    record.traffic,
                    record.delivery_time,
                    ingested_at,
                ])?;
            }
        }
        tx.commit()?;
        tracing::info!(rows = records.len(), "appended delivery records");
        Ok(records.len())
    }

    /// Fetch stored records in insertion order, optionally limited.
    pub fn fetch_all(&self, limit: Option<usize>) -> Result<Vec<DeliveryRecord>, CoreError> {
        let query = match limit {
            Some(max) => format!(
                "SELECT zone, order_type, weather, traffic, delivery_time
                 FROM deliveries ORDER BY id LIMIT {max}"
            ),
            None => "SELECT zone, order_type, weather, traffic, delivery_time
                     FROM deliveries ORDER BY id"
                .to_string(),
        };
        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map([], |row| {
            Ok(DeliveryRecord {
                zone: row.get(0)?,
                order_type: row.get(1)?,
                weather: row.get(2)?,
                traffic: row.get(3)?,
                delivery_time: row.get(4)?,
            })
        })?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Number of stored records.
    pub fn count(&self) -> Result<usize, CoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM deliveries", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Delete every record, returning the number removed.
    pub fn purge(&self) -> Result<usize, CoreError> {
        let removed = self.conn.execute("DELETE FROM deliveries", [])?;
        tracing::info!(rows = removed, "purged delivery records");
        Ok(removed)
    }
}
