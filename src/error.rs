//! Error types for the tabprep pipeline

use thiserror::Error;

/// Result type alias for tabprep operations
pub type Result<T> = std::result::Result<T, PrepError>;

/// Main error type for the pipeline.
///
/// No stage performs local recovery; every failure propagates to the
/// caller with no partial result.
#[derive(Error, Debug)]
pub enum PrepError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Schema mismatch: expected columns [{expected}], got [{actual}]")]
    SchemaMismatch { expected: String, actual: String },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Column is entirely null, no statistic computable: {0}")]
    AllNullColumn(String),

    #[error("Artifact not found: {0}")]
    ArtifactNotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Transformer not fitted")]
    NotFitted,
}

impl From<polars::error::PolarsError> for PrepError {
    fn from(err: polars::error::PolarsError) -> Self {
        PrepError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for PrepError {
    fn from(err: serde_json::Error) -> Self {
        PrepError::SerializationError(err.to_string())
    }
}
