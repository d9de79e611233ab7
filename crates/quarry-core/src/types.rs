//! Lightweight logical values and the columnar `RowBatch` every stage passes around.
//!
//! A batch is a list of named columns of equal length; a row is the same
//! index across all columns. Readers build batches, transformers consume and
//! return them, sinks drain them.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::DataType;

/// Canonical text form for timestamps written to sinks and logs.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    I64(i64),
    F64(f64),
    Str(String),
    Timestamp(NaiveDateTime),
}

impl Scalar {
    pub fn data_type(&self) -> DataType {
        match self {
            Scalar::Null => DataType::Null,
            Scalar::I64(_) => DataType::Int64,
            Scalar::F64(_) => DataType::Float64,
            Scalar::Str(_) => DataType::Utf8,
            Scalar::Timestamp(_) => DataType::Timestamp,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Numeric view used by arithmetic on derived columns.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::I64(i) => Some(*i as f64),
            Scalar::F64(f) => Some(*f),
            _ => None,
        }
    }

    /// Hashable identity of this value for set membership checks.
    pub fn key(&self) -> ScalarKey {
        ScalarKey::from(self)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "NULL"),
            Scalar::I64(i) => write!(f, "{i}"),
            Scalar::F64(x) => write!(f, "{x}"),
            Scalar::Str(s) => write!(f, "{s}"),
            Scalar::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
        }
    }
}

/// Normalized, hashable form of a `Scalar`.
///
/// Floats with an integral value compare equal to the matching integer, and
/// `-0.0` equals `0.0`; every other float is keyed by its bit pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarKey {
    Null,
    Int(i64),
    Float(u64),
    Str(String),
    Timestamp(NaiveDateTime),
}

impl From<&Scalar> for ScalarKey {
    fn from(s: &Scalar) -> Self {
        match s {
            Scalar::Null => ScalarKey::Null,
            Scalar::I64(i) => ScalarKey::Int(*i),
            Scalar::F64(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    ScalarKey::Int(*f as i64)
                } else {
                    ScalarKey::Float(f.to_bits())
                }
            }
            Scalar::Str(s) => ScalarKey::Str(s.clone()),
            Scalar::Timestamp(ts) => ScalarKey::Timestamp(*ts),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Scalar>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Scalar>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Columnar table. Column names are unique and all columns share one length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowBatch {
    pub columns: Vec<Column>,
}

impl RowBatch {
    /// Build a batch, checking name uniqueness and equal column lengths.
    pub fn try_new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(Error::Schema(format!("duplicate column '{}'", col.name)));
            }
        }
        if let Some(first) = columns.first() {
            if let Some(bad) = columns.iter().find(|c| c.len() != first.len()) {
                return Err(Error::Schema(format!(
                    "column '{}' has {} rows, expected {}",
                    bad.name,
                    bad.len(),
                    first.len()
                )));
            }
        }
        Ok(Self { columns })
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Append a column at the end. Name must be new and length must match.
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if self.index_of(&column.name).is_some() {
            return Err(Error::Schema(format!(
                "duplicate column '{}'",
                column.name
            )));
        }
        if !self.columns.is_empty() && column.len() != self.num_rows() {
            return Err(Error::Schema(format!(
                "column '{}' has {} rows, expected {}",
                column.name,
                column.len(),
                self.num_rows()
            )));
        }
        self.columns.push(column);
        Ok(())
    }

    /// Rename `from` to `to`. Returns `Ok(false)` if `from` is absent.
    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<bool> {
        if from == to {
            return Ok(self.index_of(from).is_some());
        }
        let Some(idx) = self.index_of(from) else {
            return Ok(false);
        };
        if self.index_of(to).is_some() {
            return Err(Error::Schema(format!(
                "cannot rename '{}' to existing column '{}'",
                from, to
            )));
        }
        self.columns[idx].name = to.to_string();
        Ok(true)
    }

    /// Remove a column by name, returning it if present.
    pub fn drop_column(&mut self, name: &str) -> Option<Column> {
        let idx = self.index_of(name)?;
        Some(self.columns.remove(idx))
    }

    /// Gather the given row indices (in the given order) into a new batch.
    pub fn take_rows(&self, indices: &[usize]) -> RowBatch {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                values: indices.iter().map(|&i| c.values[i].clone()).collect(),
            })
            .collect();
        RowBatch { columns }
    }

    /// Borrow row `idx` as a vector of values in column order.
    pub fn row(&self, idx: usize) -> Vec<&Scalar> {
        self.columns.iter().map(|c| &c.values[idx]).collect()
    }

    /// Concatenate two RowBatches side-by-side (for join results).
    ///
    /// All rows from `left` and `right` must have the same count.
    /// Columns are laid out left then right; a right column whose name
    /// already exists on the left gets a `_right` suffix.
    pub fn concat(left: &RowBatch, right: &RowBatch) -> Result<RowBatch> {
        if left.num_rows() != right.num_rows() {
            return Err(Error::Schema(format!(
                "cannot concat batches with different row counts: {} vs {}",
                left.num_rows(),
                right.num_rows()
            )));
        }

        let mut columns = Vec::with_capacity(left.columns.len() + right.columns.len());
        columns.extend(left.columns.iter().cloned());

        for col in &right.columns {
            let mut new_col = col.clone();
            if left.columns.iter().any(|c| c.name == col.name) {
                new_col.name = format!("{}_right", col.name);
            }
            columns.push(new_col);
        }

        RowBatch::try_new(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch() -> RowBatch {
        RowBatch::try_new(vec![
            Column::new("id", vec![Scalar::I64(1), Scalar::I64(2)]),
            Column::new("name", vec![Scalar::Str("a".into()), Scalar::Null]),
        ])
        .unwrap()
    }

    #[test]
    fn try_new_rejects_ragged_columns() {
        let err = RowBatch::try_new(vec![
            Column::new("a", vec![Scalar::I64(1)]),
            Column::new("b", vec![]),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("'b' has 0 rows"));
    }

    #[test]
    fn try_new_rejects_duplicate_names() {
        let err = RowBatch::try_new(vec![
            Column::new("a", vec![]),
            Column::new("a", vec![]),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("duplicate column 'a'"));
    }

    #[test]
    fn rename_absent_column_is_noop() {
        let mut b = batch();
        assert!(!b.rename_column("missing", "other").unwrap());
        assert_eq!(b.column_names(), vec!["id", "name"]);
    }

    #[test]
    fn rename_onto_existing_column_fails() {
        let mut b = batch();
        assert!(b.rename_column("id", "name").is_err());
    }

    #[test]
    fn integral_float_keys_match_ints() {
        assert_eq!(Scalar::F64(3.0).key(), Scalar::I64(3).key());
        assert_ne!(Scalar::F64(3.5).key(), Scalar::I64(3).key());
        assert_eq!(Scalar::F64(-0.0).key(), Scalar::F64(0.0).key());
    }

    #[test]
    fn concat_suffixes_clashing_names() {
        let left = batch();
        let right = RowBatch::try_new(vec![Column::new(
            "name",
            vec![Scalar::Str("x".into()), Scalar::Str("y".into())],
        )])
        .unwrap();
        let out = RowBatch::concat(&left, &right).unwrap();
        assert_eq!(out.column_names(), vec!["id", "name", "name_right"]);
    }

    #[test]
    fn take_rows_reorders() {
        let b = batch().take_rows(&[1, 0]);
        assert_eq!(b.column("id").unwrap().values, vec![Scalar::I64(2), Scalar::I64(1)]);
    }
}
