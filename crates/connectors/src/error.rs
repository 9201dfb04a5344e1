use model::pagination::cursor::Cursor;
use thiserror::Error;

/// Failures of the underlying message store. Surfaced to callers verbatim.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Query failed: {0}")]
    Query(String),

    #[error("Fetch failed at cursor {cursor:?}: {message}")]
    Fetch { cursor: Cursor, message: String },

    #[error("Invalid cursor for message log: {0}")]
    InvalidCursor(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode log entry on line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
