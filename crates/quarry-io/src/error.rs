use thiserror::Error;

/// Result type local to quarry-io.
pub type Result<T> = std::result::Result<T, IoError>;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("cannot open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot connect to database '{path}': {source}")]
    Connection {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("'{path}' line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        path: String,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("'{path}': header {found:?} does not match declared columns {expected:?}")]
    HeaderMismatch {
        path: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("table '{0}' is in the load order but was not produced")]
    MissingTable(String),

    #[error(transparent)]
    Core(#[from] quarry_core::error::Error),
}
