//! Convenient re-exports for downstream crates.

pub use crate::config::{DatabaseConfig, PipelineConfig};
pub use crate::error::{Error, Result};
pub use crate::hash::{hash_batch, Hash256};
pub use crate::manifest::{LoadedTable, ManifestId, RunManifest};
pub use crate::schema::{DataType, EntityTable, Field, Schema, SourceSpec};
pub use crate::types::{Column, RowBatch, Scalar, ScalarKey};
