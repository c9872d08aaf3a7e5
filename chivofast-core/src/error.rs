//! Error types for the chivofast-core crate.

use thiserror::Error;

/// Top-level error type for record storage and ingestion.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Store error: {0}")]
    Store(String),

    #[error("Ingestion error: {0}")]
    Ingest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl CoreError {
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn ingest(msg: impl Into<String>) -> Self {
        Self::Ingest(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
