//! Reusable checks over a `RowBatch`.
//!
//! Each check either passes or returns the first structural defect it finds.
//! Nulls are ordinary values here: two nulls are duplicates of each other,
//! and a null foreign key only passes if null is itself a referenced key.

use std::collections::{HashMap, HashSet};

use quarry_core::types::{Column, RowBatch, ScalarKey};

use crate::error::ValidationError;

pub(crate) fn column_of<'a>(
    table: &'a RowBatch,
    name: &str,
) -> Result<&'a Column, ValidationError> {
    table
        .column(name)
        .ok_or_else(|| ValidationError::UnknownColumn(name.to_string()))
}

/// Fails if any value in `column` appears more than once.
pub fn validate_unique(table: &RowBatch, column: &str) -> Result<(), ValidationError> {
    let col = column_of(table, column)?;
    let mut counts: HashMap<ScalarKey, usize> = HashMap::with_capacity(col.len());
    let mut first_dup: Option<usize> = None;

    for (row, value) in col.values.iter().enumerate() {
        let n = counts.entry(value.key()).or_insert(0);
        *n += 1;
        if *n == 2 && first_dup.is_none() {
            first_dup = Some(row);
        }
    }

    match first_dup {
        None => Ok(()),
        Some(row) => {
            let value = col.values[row].clone();
            let occurrences = counts.get(&value.key()).copied().unwrap_or(2);
            Err(ValidationError::Duplicate {
                column: column.to_string(),
                value,
                occurrences,
            })
        }
    }
}

/// Fails if any of `columns` holds a null. All columns must exist.
pub fn validate_not_null(table: &RowBatch, columns: &[&str]) -> Result<(), ValidationError> {
    let cols = columns
        .iter()
        .map(|name| column_of(table, name))
        .collect::<Result<Vec<_>, _>>()?;

    for col in cols {
        let rows: Vec<usize> = col
            .values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_null())
            .map(|(i, _)| i)
            .collect();
        if !rows.is_empty() {
            return Err(ValidationError::MissingValues {
                column: col.name.clone(),
                rows,
            });
        }
    }
    Ok(())
}

/// Fails if some value of `table[fk_column]` is absent from `referenced[pk_column]`.
///
/// The error lists every distinct missing value in first-seen order.
pub fn validate_references(
    table: &RowBatch,
    referenced: &RowBatch,
    fk_column: &str,
    pk_column: &str,
) -> Result<(), ValidationError> {
    let fk = column_of(table, fk_column)?;
    let pk = column_of(referenced, pk_column)?;

    let valid: HashSet<ScalarKey> = pk.values.iter().map(|v| v.key()).collect();

    let mut seen = HashSet::new();
    let missing: Vec<_> = fk
        .values
        .iter()
        .filter(|v| {
            let key = v.key();
            !valid.contains(&key) && seen.insert(key)
        })
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::DanglingReference {
            fk_column: fk_column.to_string(),
            pk_column: pk_column.to_string(),
            missing,
        })
    }
}
