//! Column-level reshaping: renames, drops, type coercion, joins.
//!
//! Renames and drops of absent columns are no-ops, so applying a reshape to
//! an already-shaped table leaves it unchanged.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use quarry_core::schema::DataType;
use quarry_core::types::{Column, RowBatch, Scalar, ScalarKey};

use crate::error::ValidationError;
use crate::validate::column_of;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Apply `(from, to)` renames in order. Missing `from` columns are skipped.
pub fn rename_columns(
    mut batch: RowBatch,
    renames: &[(&str, &str)],
) -> Result<RowBatch, ValidationError> {
    for (from, to) in renames {
        batch.rename_column(from, to)?;
    }
    Ok(batch)
}

/// Remove the named columns. Missing columns are skipped.
pub fn drop_columns(mut batch: RowBatch, columns: &[&str]) -> RowBatch {
    for name in columns {
        batch.drop_column(name);
    }
    batch
}

/// Lowercase every string value of `column`; other values are left alone.
pub fn lowercase(mut batch: RowBatch, column: &str) -> Result<RowBatch, ValidationError> {
    let col = batch
        .column_mut(column)
        .ok_or_else(|| ValidationError::UnknownColumn(column.to_string()))?;
    for v in &mut col.values {
        if let Scalar::Str(s) = v {
            *s = s.to_lowercase();
        }
    }
    Ok(batch)
}

/// Coerce `column` to `I64`. Integral floats and integer-looking strings are
/// accepted; anything else (including null) is a `Coercion` error.
pub fn coerce_to_int(mut batch: RowBatch, column: &str) -> Result<RowBatch, ValidationError> {
    let col = batch
        .column_mut(column)
        .ok_or_else(|| ValidationError::UnknownColumn(column.to_string()))?;
    for (row, v) in col.values.iter_mut().enumerate() {
        let coerced = match &*v {
            Scalar::I64(i) => Some(*i),
            Scalar::F64(f) => integral(*f),
            Scalar::Str(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(integral))
            }
            Scalar::Null | Scalar::Timestamp(_) => None,
        };
        match coerced {
            Some(i) => *v = Scalar::I64(i),
            None => {
                return Err(ValidationError::Coercion {
                    column: column.to_string(),
                    row,
                    value: v.clone(),
                    target: DataType::Int64,
                })
            }
        }
    }
    Ok(batch)
}

fn integral(f: f64) -> Option<i64> {
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
}

/// Parse a calendar date or date-time in one of the accepted layouts.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Convert `column` to `Timestamp`. Any value that does not parse (null
/// included) is an `UnparseableTimestamp` error.
pub fn parse_timestamps(mut batch: RowBatch, column: &str) -> Result<RowBatch, ValidationError> {
    let col = batch
        .column_mut(column)
        .ok_or_else(|| ValidationError::UnknownColumn(column.to_string()))?;
    for (row, v) in col.values.iter_mut().enumerate() {
        let parsed = match &*v {
            Scalar::Timestamp(ts) => Some(*ts),
            Scalar::Str(s) => parse_timestamp(s),
            _ => None,
        };
        match parsed {
            Some(ts) => *v = Scalar::Timestamp(ts),
            None => {
                return Err(ValidationError::UnparseableTimestamp {
                    column: column.to_string(),
                    row,
                    raw: v.to_string(),
                })
            }
        }
    }
    Ok(batch)
}

/// Inner join on a column both sides share by name.
///
/// Output rows follow the left table's order (and, per left row, the right
/// table's order). The right key column is not repeated; other clashing
/// right column names get a `_right` suffix.
pub fn inner_join(left: &RowBatch, right: &RowBatch, on: &str) -> Result<RowBatch, ValidationError> {
    let lkey = column_of(left, on)?;
    let rkey = column_of(right, on)?;

    let mut index: HashMap<ScalarKey, Vec<usize>> = HashMap::new();
    for (i, v) in rkey.values.iter().enumerate() {
        index.entry(v.key()).or_default().push(i);
    }

    let mut lrows = Vec::new();
    let mut rrows = Vec::new();
    for (li, v) in lkey.values.iter().enumerate() {
        if let Some(matches) = index.get(&v.key()) {
            for &ri in matches {
                lrows.push(li);
                rrows.push(ri);
            }
        }
    }

    let mut right_rest = right.clone();
    right_rest.drop_column(on);
    Ok(RowBatch::concat(
        &left.take_rows(&lrows),
        &right_rest.take_rows(&rrows),
    )?)
}

/// Every pairing of `left` values with `right` values, left-major.
pub fn cross_join(left: &Column, right: &Column) -> Result<RowBatch, ValidationError> {
    let n = left.len() * right.len();
    let mut lvals = Vec::with_capacity(n);
    let mut rvals = Vec::with_capacity(n);
    for l in &left.values {
        for r in &right.values {
            lvals.push(l.clone());
            rvals.push(r.clone());
        }
    }
    Ok(RowBatch::try_new(vec![
        Column::new(left.name.clone(), lvals),
        Column::new(right.name.clone(), rvals),
    ])?)
}
