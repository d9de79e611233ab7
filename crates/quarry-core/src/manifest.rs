//! Run manifest: what one pipeline run loaded, for audit.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hash::Hash256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestId(pub Uuid);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedTable {
    pub name: String,
    pub rows: usize,
    pub digest: Hash256,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub id: ManifestId,

    /// Which pipeline produced this run (`retail`, `warehouse`).
    pub pipeline: String,

    /// Engine version string for provenance.
    pub engine_version: String,

    /// Tables in the order they were appended to the sink.
    pub tables: Vec<LoadedTable>,

    /// Milliseconds since Unix epoch (UTC).
    pub started_ms: u64,
    pub finished_ms: u64,
}

impl RunManifest {
    pub fn new(pipeline: impl Into<String>, started_ms: u64) -> Self {
        Self {
            id: ManifestId(Uuid::new_v4()),
            pipeline: pipeline.into(),
            engine_version: crate::VERSION.to_string(),
            tables: vec![],
            started_ms,
            finished_ms: started_ms,
        }
    }

    pub fn record(&mut self, table: LoadedTable) {
        self.tables.push(table);
    }

    pub fn finish(mut self, finished_ms: u64) -> Self {
        self.finished_ms = finished_ms;
        self
    }

    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }
}
