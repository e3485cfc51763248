use model::core::value::Value;
use thiserror::Error;

/// Errors raised by the bundled query backends and dataset loaders.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// A filter or ordering names a column the record does not have.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Two non-null values of column `column` cannot be ordered against each other.
    #[error("Cannot compare {left:?} with {right:?} on column '{column}'")]
    Incomparable {
        column: String,
        left: Value,
        right: Value,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file parsed but its shape is not a flat table.
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    /// Failure reported by a caller-supplied SQL executor.
    #[error("Executor error: {0}")]
    Executor(String),
}
