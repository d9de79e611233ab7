//! Readers that produce one `RowBatch` per source.
//!
//! Sources are small batch extracts, so each reader materializes the whole
//! source in memory.

pub mod csv;
pub mod sql;
