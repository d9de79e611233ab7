use quarry_core::schema::DataType;
use quarry_core::types::Scalar;
use thiserror::Error;

/// Why a table failed a check. Every variant is fatal for the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("column '{0}' not found")]
    UnknownColumn(String),

    #[error("duplicate value {value} in column '{column}' ({occurrences} occurrences)")]
    Duplicate {
        column: String,
        value: Scalar,
        occurrences: usize,
    },

    #[error("missing values in column '{column}' at rows {rows:?}")]
    MissingValues { column: String, rows: Vec<usize> },

    #[error("values of '{fk_column}' not present in '{pk_column}': {missing:?}")]
    DanglingReference {
        fk_column: String,
        pk_column: String,
        missing: Vec<Scalar>,
    },

    #[error("unparseable timestamp {raw:?} in column '{column}' at row {row}")]
    UnparseableTimestamp {
        column: String,
        row: usize,
        raw: String,
    },

    #[error("cannot coerce {value} in column '{column}' at row {row} to {target:?}")]
    Coercion {
        column: String,
        row: usize,
        value: Scalar,
        target: DataType,
    },

    #[error("schema error: {0}")]
    Schema(String),
}

impl From<quarry_core::error::Error> for ValidationError {
    fn from(e: quarry_core::error::Error) -> Self {
        ValidationError::Schema(e.to_string())
    }
}

/// A validation failure attributed to the entity being transformed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{entity}: {source}")]
pub struct TransformError {
    pub entity: &'static str,
    pub source: ValidationError,
}

impl TransformError {
    pub fn new(entity: &'static str, source: ValidationError) -> Self {
        Self { entity, source }
    }
}

/// Rows whose derived value was overwritten instead of rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Healed {
    pub column: String,
    pub rows: Vec<usize>,
}
