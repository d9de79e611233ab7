#![forbid(unsafe_code)]
//! quarry-io: everything that touches files or databases.
//!
//! - `readers`: delimited files and SQL queries → `RowBatch`
//! - `writers`: append-only sinks and the ordered load loop
//! - `connection`: opening source/sink databases from config
//!
//! All functions return `IoError`; none of them exit the process.

pub mod connection;
pub mod error;
pub mod readers;
pub mod writers;

pub use connection::{open_database, Access};
pub use error::{IoError, Result};
pub use readers::csv::{read_delimited, read_delimited_from};
pub use readers::sql::read_query;
pub use writers::jsonl::JsonlSink;
pub use writers::sql::SqlSink;
pub use writers::{load_in_order, Sink};
