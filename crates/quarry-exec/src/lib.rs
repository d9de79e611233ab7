#![forbid(unsafe_code)]
//! quarry-exec: drives the retail and warehouse pipelines.
//!
//! A run is read → transform → (synthesize) → load. Nothing is loaded until
//! every transform has succeeded; the first failure is reported through the
//! injected `Reporter` and returned as an `ExecError`.

pub mod error;
pub mod pipeline;
pub mod report;

pub use error::ExecError;
pub use pipeline::retail::RetailPipeline;
pub use pipeline::warehouse::WarehousePipeline;
pub use pipeline::Pipeline;
pub use report::{Event, RecordingReporter, Reporter, TracingReporter};
