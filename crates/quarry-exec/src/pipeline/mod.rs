//! The `Pipeline` trait and the pieces both shipped pipelines share.

pub mod retail;
pub mod warehouse;

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use quarry_core::config::PipelineConfig;
use quarry_core::manifest::{LoadedTable, RunManifest};
use quarry_core::schema::EntityTable;
use quarry_core::types::RowBatch;
use quarry_io::{load_in_order, open_database, read_delimited, Access, Sink, SqlSink};
use quarry_operators::{validate_unique, Healed, TransformError};

use crate::error::ExecError;
use crate::report::Reporter;

/// Name of the stage that appends to the sink.
pub const LOAD_STAGE: &str = "load";
/// Name under which a failure to open the configured sink is reported.
pub const CONNECT_STAGE: &str = "connect";

pub trait Pipeline {
    fn name(&self) -> &'static str;

    /// Tables in the order they are appended. Parents come first.
    fn load_order(&self) -> &'static [&'static str];

    /// Key into `PipelineConfig::databases` for the SQL sink.
    fn sink_database(&self) -> &'static str;

    fn defaults(&self) -> PipelineConfig;

    /// Read and transform every entity without loading anything.
    fn prepare(
        &self,
        config: &PipelineConfig,
        reporter: &mut dyn Reporter,
    ) -> Result<BTreeMap<String, EntityTable>, ExecError>;

    fn open_sink(&self, config: &PipelineConfig) -> Result<SqlSink, ExecError> {
        let db = config.database(self.sink_database())?;
        let conn = open_database(db, Access::ReadWrite).map_err(ExecError::Connection)?;
        Ok(SqlSink::new(conn))
    }

    /// Prepare every table, then append them to `sink` in load order.
    fn run(
        &self,
        config: &PipelineConfig,
        sink: &mut dyn Sink,
        reporter: &mut dyn Reporter,
    ) -> Result<RunManifest, ExecError> {
        let manifest = begin(self.name());
        let tables = self.prepare(config, reporter)?;
        load(manifest, self.load_order(), tables, sink, reporter)
    }

    /// Like `run` against the configured SQL sink. The sink database is only
    /// opened once every table has been prepared.
    fn run_to_database(
        &self,
        config: &PipelineConfig,
        reporter: &mut dyn Reporter,
    ) -> Result<RunManifest, ExecError> {
        let manifest = begin(self.name());
        let tables = self.prepare(config, reporter)?;
        let mut sink = self
            .open_sink(config)
            .inspect_err(|e| reporter.failed(CONNECT_STAGE, e))?;
        load(manifest, self.load_order(), tables, &mut sink, reporter)
    }
}

fn begin(pipeline: &'static str) -> RunManifest {
    let manifest = RunManifest::new(pipeline, now_ms());
    tracing::info!(pipeline, id = %manifest.id.0, "pipeline started");
    manifest
}

fn load(
    mut manifest: RunManifest,
    order: &[&str],
    mut tables: BTreeMap<String, EntityTable>,
    sink: &mut dyn Sink,
    reporter: &mut dyn Reporter,
) -> Result<RunManifest, ExecError> {
    let loaded = stage(reporter, LOAD_STAGE, || {
        load_in_order(sink, order, &mut tables).map_err(ExecError::Load)
    })?;
    for table in loaded {
        manifest.record(table);
    }

    let manifest = manifest.finish(now_ms());
    tracing::info!(
        pipeline = %manifest.pipeline,
        rows = manifest.total_rows(),
        elapsed_ms = manifest.finished_ms.saturating_sub(manifest.started_ms),
        "pipeline finished"
    );
    Ok(manifest)
}

/// Anything a stage can produce, with the row count reported for it.
pub(crate) trait StageOutput {
    fn rows(&self) -> usize;
}

impl StageOutput for RowBatch {
    fn rows(&self) -> usize {
        self.num_rows()
    }
}

impl StageOutput for (RowBatch, Option<Healed>) {
    fn rows(&self) -> usize {
        self.0.num_rows()
    }
}

impl StageOutput for Vec<LoadedTable> {
    fn rows(&self) -> usize {
        self.iter().map(|t| t.rows).sum()
    }
}

/// Run one stage, bracketing it with start/finish reports. A failure is
/// reported before it is returned.
pub(crate) fn stage<T: StageOutput>(
    reporter: &mut dyn Reporter,
    name: &str,
    work: impl FnOnce() -> Result<T, ExecError>,
) -> Result<T, ExecError> {
    reporter.stage_started(name);
    match work() {
        Ok(out) => {
            reporter.stage_finished(name, out.rows());
            Ok(out)
        }
        Err(e) => {
            reporter.failed(name, &e);
            Err(e)
        }
    }
}

pub(crate) fn read_source(config: &PipelineConfig, entity: &str) -> Result<RowBatch, ExecError> {
    let spec = config.source(entity)?;
    read_delimited(spec).map_err(|source| ExecError::Read {
        entity: entity.to_string(),
        source,
    })
}

/// Tag `batch` as entity `name`. A declared primary key must not repeat.
pub(crate) fn entity(
    reporter: &mut dyn Reporter,
    name: &'static str,
    primary_key: Option<&str>,
    batch: RowBatch,
) -> Result<(String, EntityTable), ExecError> {
    let table = EntityTable::new(name, primary_key, batch);
    if let Some(key) = &table.primary_key {
        if let Err(source) = validate_unique(&table.batch, key) {
            let error = ExecError::from(TransformError::new(name, source));
            reporter.failed(name, &error);
            return Err(error);
        }
    }
    Ok((name.to_string(), table))
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
