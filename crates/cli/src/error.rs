use connectors::error::StoreError;
use engine_core::error::QueryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse the filter as JSON: {0}")]
    FilterParse(#[source] serde_json::Error),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[source] serde_json::Error),

    #[error("Failed to run the query: {0}")]
    Query(#[from] QueryError),

    #[error("Failed to load the message log: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Either --filter or --filter-file is required")]
    MissingFilter,
}
