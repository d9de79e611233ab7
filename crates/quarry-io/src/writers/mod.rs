//! Append-only sinks and the ordered load loop.
//!
//! The loader performs no dependency resolution: callers pass tables in an
//! order that puts parents before children. A failure stops the loop and
//! leaves already-appended tables in place.

pub mod jsonl;
pub mod sql;

use std::collections::BTreeMap;

use quarry_core::hash::hash_batch;
use quarry_core::manifest::LoadedTable;
use quarry_core::schema::EntityTable;
use quarry_core::types::RowBatch;

use crate::error::{IoError, Result};

/// Destination that appends rows to named tables. Never replaces, never upserts.
pub trait Sink {
    /// Stable short name for logs.
    fn name(&self) -> &'static str;

    /// Append every row of `batch` to `table`, returning the number of rows written.
    fn append(&mut self, table: &str, batch: &RowBatch) -> Result<usize>;
}

/// Append `tables` to `sink` in exactly the order given by `order`.
///
/// Each table is consumed as it is written.
pub fn load_in_order(
    sink: &mut dyn Sink,
    order: &[&str],
    tables: &mut BTreeMap<String, EntityTable>,
) -> Result<Vec<LoadedTable>> {
    let mut loaded = Vec::with_capacity(order.len());
    for &name in order {
        let table = tables
            .remove(name)
            .ok_or_else(|| IoError::MissingTable(name.to_string()))?;
        let digest = hash_batch(&table.batch);
        let rows = sink.append(&table.name, &table.batch)?;
        tracing::info!(table = %table.name, rows, sink = sink.name(), "table loaded");
        loaded.push(LoadedTable {
            name: table.name,
            rows,
            digest,
        });
    }
    Ok(loaded)
}
