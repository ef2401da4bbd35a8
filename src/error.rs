//! Error types for rusty-curves

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for curve ingestion, construction and storage
#[derive(Error, Debug)]
pub enum CurveError {
    #[error("Fetch error for series {series}: {message}")]
    Fetch { series: String, message: String },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Bootstrap error: {0}")]
    Bootstrap(String),

    #[error("Bootstrap failed for {date}: {source}")]
    BootstrapOnDate {
        date: NaiveDate,
        #[source]
        source: Box<CurveError>,
    },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl CurveError {
    /// Fetch failure for a named series
    pub fn fetch(series: impl Into<String>, message: impl Into<String>) -> Self {
        CurveError::Fetch {
            series: series.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for rusty-curves operations
pub type Result<T> = std::result::Result<T, CurveError>;
