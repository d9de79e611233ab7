#![forbid(unsafe_code)]
//! quarry-core: the in-memory tabular model shared by every pipeline stage.
//!
//! - `types`: `Scalar`, `Column`, `RowBatch` (columnar, equal-length columns)
//! - `schema`: declarative source schemas and entity tables
//! - `catalog`: entity/column names and default layouts of the shipped pipelines
//! - `config`: YAML configuration provider with env overrides
//! - `manifest`/`hash`: per-run audit record with content digests
//!
//! No database or file-format code lives here.

pub mod catalog;
pub mod config;
pub mod error;
pub mod hash;
pub mod manifest;
pub mod prelude;
pub mod schema;
pub mod types;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
