//! Error types for the price_forecast crate

use chrono::NaiveDate;
use thiserror::Error;

/// Custom error types for the price_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Too few distinct observations (or rows) to fit a model
    #[error("Insufficient data: need at least {required} distinct observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// A negative or non-finite value, or an unparseable date
    #[error("Invalid observation: {0}")]
    InvalidObservation(String),

    /// The query date is before the history or past the forecast horizon
    #[error("Date {date} is out of range: forecasts are available from {earliest} to {latest}")]
    DateOutOfRange {
        date: NaiveDate,
        earliest: NaiveDate,
        latest: NaiveDate,
    },

    /// Feature rows do not line up with the fitted schema or the targets
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from the numeric layer
    #[error("Math error: {0}")]
    Math(#[from] agri_math::MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from reading CSV input
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error from (de)serializing a model or result
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
