use connectors::error::StoreError;
use model::filter::error::CompileError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Failed to compile filter: {0}")]
    Compile(#[from] CompileError),

    #[error("Store query failed: {0}")]
    Store(#[from] StoreError),

    #[error("[{plugin} v{version}] is only valid for hosts exposing a message store")]
    UnsupportedHost {
        plugin: &'static str,
        version: &'static str,
    },

    #[error("Invalid page size {size}: {reason}")]
    InvalidPageSize { size: usize, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to decode query: {0}")]
    Decode(#[from] serde_json::Error),
}
