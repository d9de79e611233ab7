//! Logical schema types and the declarative description of each source.
//!
//! `SourceSpec` is the single place a source's columns are declared: the
//! reader uses it to name (or check) columns, and the transformers address
//! the same names.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::RowBatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Null,
    Int64,
    Float64,
    Utf8,
    Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    /// Observed schema of a batch: a column's type is the type of its first
    /// non-null value, and it is nullable if any value is null.
    pub fn of(batch: &RowBatch) -> Self {
        let fields = batch
            .columns
            .iter()
            .map(|c| {
                let data_type = c
                    .values
                    .iter()
                    .find(|v| !v.is_null())
                    .map(|v| v.data_type())
                    .unwrap_or(DataType::Null);
                let nullable = c.values.iter().any(|v| v.is_null());
                Field::new(c.name.clone(), data_type, nullable)
            })
            .collect();
        Self { fields }
    }
}

/// Where a delimited source lives and how its records are laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub path: String,

    /// Single-byte field separator (`|` or `,` in practice).
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Whether the first line names the columns.
    #[serde(default)]
    pub header: bool,

    /// Declared column order. Required for headerless files; for files with
    /// a header it is optional and, when given, must match the header.
    #[serde(default)]
    pub columns: Vec<String>,
}

fn default_delimiter() -> char {
    ','
}

impl SourceSpec {
    pub fn headerless(path: impl Into<String>, delimiter: char, columns: &[&str]) -> Self {
        Self {
            path: path.into(),
            delimiter,
            header: false,
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn with_header(path: impl Into<String>, delimiter: char) -> Self {
        Self {
            path: path.into(),
            delimiter,
            header: true,
            columns: vec![],
        }
    }

    /// Declare the columns a header line must name.
    pub fn with_columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(Error::Config(format!(
                "delimiter {:?} for '{}' is not a single byte",
                self.delimiter, self.path
            )))
        }
    }

    /// A headerless source is unusable without declared columns.
    pub fn check(&self) -> Result<()> {
        self.delimiter_byte()?;
        if !self.header && self.columns.is_empty() {
            return Err(Error::Config(format!(
                "source '{}' has no header and no declared columns",
                self.path
            )));
        }
        Ok(())
    }
}

/// A batch tagged with the business entity it represents.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityTable {
    pub name: String,
    /// `None` for fact tables, whose key is the composite of their references.
    pub primary_key: Option<String>,
    pub batch: RowBatch,
}

impl EntityTable {
    pub fn new(name: impl Into<String>, primary_key: Option<&str>, batch: RowBatch) -> Self {
        Self {
            name: name.into(),
            primary_key: primary_key.map(str::to_string),
            batch,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }
}
