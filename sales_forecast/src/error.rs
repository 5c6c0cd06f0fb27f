//! Error types for the sales_forecast crate

use forecast_math::MathError;
use thiserror::Error;

/// Custom error types for the sales_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Historical data file or model artifact is missing
    #[error("Data not found: {0}")]
    DataNotFound(String),

    /// Historical series has no records, so there is no anchor date
    #[error("Historical sales data is empty")]
    EmptyHistory,

    /// Not enough records to split into train and held-out partitions
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// A single forecast step failed
    #[error("Prediction error at step {step}: {reason}")]
    PredictionError { step: usize, reason: String },

    /// Error related to a trained model or its artifact
    #[error("Model error: {0}")]
    ModelError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from calendar arithmetic
    #[error("Date error: {0}")]
    DateError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from JSON (de)serialization
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Error from the regression math
    #[error("Math error: {0}")]
    MathError(#[from] MathError),
}

impl ForecastError {
    /// Whether the service should answer with the fallback forecast instead
    /// of surfacing this error.
    ///
    /// Only an empty history is a hard failure.
    pub fn is_fallback_eligible(&self) -> bool {
        !matches!(self, ForecastError::EmptyHistory)
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
