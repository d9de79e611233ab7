use quarry_io::IoError;
use quarry_operators::TransformError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("connection failed: {0}")]
    Connection(#[source] IoError),

    #[error("reading '{entity}' failed: {source}")]
    Read {
        entity: String,
        #[source]
        source: IoError,
    },

    #[error("validation failed: {0}")]
    Validation(#[from] TransformError),

    #[error("load failed: {0}")]
    Load(#[source] IoError),

    #[error("config error: {0}")]
    Config(#[from] quarry_core::error::Error),
}

impl ExecError {
    /// Data-quality failures, as opposed to I/O or configuration failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, ExecError::Validation(_))
    }
}
