use connectors::error::ConnectorError;
use model::pagination::mode::ModeError;
use planner::error::PaginationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid pagination mode: {0}")]
    Mode(#[from] ModeError),

    #[error("Unsupported dataset format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to load dataset: {0}")]
    Connector(#[from] ConnectorError),

    #[error("Failed to fetch page: {0}")]
    Pagination(#[from] PaginationError<ConnectorError>),

    #[error("Failed to (de)serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}
