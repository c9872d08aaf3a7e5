//! # chivofast-core — Records, Storage & Ingestion
//!
//! Domain types and collaborator services for the ChivoFast
//! delivery-time estimation toolkit: the delivery record model, TOML
//! configuration, the SQLite record store, CSV ingestion/export, and
//! KPI summaries. The estimation pipeline itself lives in
//! `chivofast-ml`.

pub mod config;
pub mod error;
pub mod ingest;
pub mod records;
pub mod store;
pub mod summary;

pub use config::ChivofastConfig;
pub use error::CoreError;
pub use records::{DeliveryRecord, RawRecord, Traffic, Weather, filter_usable};
pub use store::DeliveryStore;
pub use summary::{KpiReport, summarize};
