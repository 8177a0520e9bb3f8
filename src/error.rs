//! Error types for the MORL core crate

use thiserror::Error;

/// Main error type for the MORL core crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("dimension mismatch: expected {expected} objectives, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("front point {point} does not dominate reference point {reference}")]
    InvalidReference { point: String, reference: String },

    #[error("training delegate failed after {attempts} attempt(s): {message}")]
    TrainingFailure { attempts: usize, message: String },

    #[error("objective value {value} at index {index} must be finite")]
    InvalidObjectiveValue { value: f64, index: usize },

    #[error("invalid weight vector: {reason}")]
    InvalidWeightVector { reason: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("operation requires a non-empty front")]
    EmptyFront,

    #[error("invalid objective sense '{input}'. Expected one of: {expected}")]
    ParseSense { input: String, expected: String },

    #[error("invalid eviction criterion '{input}'. Expected one of: {expected}")]
    ParseEvictionCriterion { input: String, expected: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
