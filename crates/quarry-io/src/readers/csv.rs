//! Delimited-file reader.
//!
//! Columns come from the declared `SourceSpec` (headerless files) or from the
//! header line. Every record must have exactly one field per column.
//!
//! Column typing: a field equal to one of `NULL_TOKENS` is `Null`; a column
//! whose remaining fields all parse as `i64` becomes `I64`, else if they all
//! parse as `f64` it becomes `F64`, otherwise it stays `Str`.

use std::fs::File;
use std::io::Read;

use ::csv::{ReaderBuilder, StringRecord};
use quarry_core::schema::SourceSpec;
use quarry_core::types::{Column, RowBatch, Scalar};

use crate::error::{IoError, Result};

/// Field contents treated as missing values.
pub const NULL_TOKENS: [&str; 9] = ["", "NA", "N/A", "n/a", "NULL", "null", "NaN", "nan", "None"];

/// Read the file at `spec.path`.
pub fn read_delimited(spec: &SourceSpec) -> Result<RowBatch> {
    let file = File::open(&spec.path).map_err(|source| IoError::Open {
        path: spec.path.clone(),
        source,
    })?;
    let batch = read_delimited_from(file, spec)?;
    tracing::info!(
        path = %spec.path,
        rows = batch.num_rows(),
        columns = batch.num_columns(),
        "source file read"
    );
    Ok(batch)
}

/// Read delimited records from any reader, using `spec` for layout only.
pub fn read_delimited_from<R: Read>(reader: R, spec: &SourceSpec) -> Result<RowBatch> {
    spec.check()?;
    let mut rdr = ReaderBuilder::new()
        .delimiter(spec.delimiter_byte()?)
        .has_headers(spec.header)
        .flexible(true)
        .from_reader(reader);

    let names: Vec<String> = if spec.header {
        let found: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
        if !spec.columns.is_empty() && spec.columns != found {
            return Err(IoError::HeaderMismatch {
                path: spec.path.clone(),
                expected: spec.columns.clone(),
                found,
            });
        }
        found
    } else {
        spec.columns.clone()
    };

    let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
    let mut record = StringRecord::new();
    while rdr.read_record(&mut record)? {
        if record.len() != names.len() {
            return Err(IoError::FieldCount {
                path: spec.path.clone(),
                line: record.position().map(|p| p.line()).unwrap_or(0),
                expected: names.len(),
                found: record.len(),
            });
        }
        for (slot, field) in raw.iter_mut().zip(record.iter()) {
            slot.push(if NULL_TOKENS.contains(&field) {
                None
            } else {
                Some(field.to_string())
            });
        }
    }

    let columns = names
        .into_iter()
        .zip(raw)
        .map(|(name, fields)| Column::new(name, infer_column(fields)))
        .collect();
    Ok(RowBatch::try_new(columns)?)
}

fn infer_column(fields: Vec<Option<String>>) -> Vec<Scalar> {
    let present = || fields.iter().flatten();

    if present().all(|f| f.parse::<i64>().is_ok()) {
        return fields
            .iter()
            .map(|f| match f {
                Some(s) => s.parse::<i64>().map(Scalar::I64).unwrap_or(Scalar::Null),
                None => Scalar::Null,
            })
            .collect();
    }

    if present().all(|f| f.parse::<f64>().is_ok()) {
        return fields
            .iter()
            .map(|f| match f {
                Some(s) => s.parse::<f64>().map(Scalar::F64).unwrap_or(Scalar::Null),
                None => Scalar::Null,
            })
            .collect();
    }

    fields
        .into_iter()
        .map(|f| f.map(Scalar::Str).unwrap_or(Scalar::Null))
        .collect()
}
