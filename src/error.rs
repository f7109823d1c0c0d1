//! Error types for Trend Hunter
//!
//! The analysis core never fails; these errors only surface at the
//! boundary (non-JSON input, bad configuration, file and CSV problems).

use thiserror::Error;

/// Errors that can occur while feeding data into or out of the pipeline
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Failed to parse input: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Relevance threshold must be within 0-100, got {0}")]
    InvalidThreshold(f64),

    #[error("Unknown product category: {0}")]
    UnknownCategory(String),

    #[error("Unknown country code: {0}")]
    UnknownCountry(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
