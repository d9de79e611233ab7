//! NDJSON export sink: one `<table>.jsonl` file per table under a directory.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use quarry_core::types::{RowBatch, Scalar, TIMESTAMP_FORMAT};

use crate::error::{IoError, Result};
use crate::writers::Sink;

#[derive(Debug)]
pub struct JsonlSink {
    dir: PathBuf,
}

impl JsonlSink {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| IoError::Open {
            path: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.jsonl"))
    }
}

impl Sink for JsonlSink {
    fn name(&self) -> &'static str {
        "jsonl"
    }

    /// Append one JSON object per row; existing lines are kept.
    fn append(&mut self, table: &str, batch: &RowBatch) -> Result<usize> {
        let path = self.path_for(table);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| IoError::Open {
                path: path.display().to_string(),
                source,
            })?;
        let mut writer = BufWriter::new(file);

        let nrows = batch.num_rows();
        for r in 0..nrows {
            let mut obj = BTreeMap::new();
            for col in &batch.columns {
                obj.insert(col.name.as_str(), scalar_to_json(&col.values[r]));
            }
            let line = serde_json::to_string(&obj)?;
            writeln!(writer, "{}", line)?;
        }
        writer.flush()?;
        Ok(nrows)
    }
}

fn scalar_to_json(v: &Scalar) -> serde_json::Value {
    use Scalar::*;
    match v {
        Null => serde_json::Value::Null,
        I64(i) => serde_json::Value::from(*i),
        F64(f) => serde_json::Value::from(*f),
        Str(s) => serde_json::Value::String(s.clone()),
        Timestamp(ts) => serde_json::Value::String(ts.format(TIMESTAMP_FORMAT).to_string()),
    }
}
