//! Pipeline configuration: connection parameters and declared sources.
//!
//! Read once at startup from YAML, then optionally overridden from the
//! environment.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{self, warehouse};
use crate::error::{Error, Result};
use crate::schema::SourceSpec;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path of the SQLite database file.
    pub path: String,
}

impl DatabaseConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Destination of the append-only run log.
    pub log_file: String,

    /// Optional seed for the synthetic fact measures. `None` draws a fresh
    /// seed from the OS on every run.
    pub seed: Option<u64>,

    /// Logical connection name → database parameters.
    pub databases: BTreeMap<String, DatabaseConfig>,

    /// Entity name → delimited source layout.
    pub sources: BTreeMap<String, SourceSpec>,

    /// Named read-only queries against a source database.
    pub queries: BTreeMap<String, String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            log_file: "logs/pipeline.log".to_string(),
            seed: None,
            databases: BTreeMap::new(),
            sources: BTreeMap::new(),
            queries: BTreeMap::new(),
        }
    }
}

pub const OLTP_DB: &str = "oltp";
pub const TRANSACT_DB: &str = "transact";
pub const WAREHOUSE_DB: &str = "warehouse";

impl PipelineConfig {
    pub fn from_yaml_str(src: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(src)?;
        cfg.check()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("read {}: {e}", path.display())))?;
        Self::from_yaml_str(&src)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate every declared source.
    pub fn check(&self) -> Result<()> {
        for (name, spec) in &self.sources {
            spec.check()
                .map_err(|e| Error::Config(format!("source '{name}': {e}")))?;
        }
        Ok(())
    }

    /// Apply overrides from process environment variables.
    ///
    /// Environment variables:
    /// - `QUARRY_LOG_FILE`: log file path
    /// - `QUARRY_SEED`: fact-table RNG seed
    /// - `QUARRY_DB_<NAME>`: database path for connection `<name>` (upper-cased)
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(s) = lookup("QUARRY_LOG_FILE") {
            self.log_file = s;
        }

        if let Some(s) = lookup("QUARRY_SEED") {
            if let Ok(v) = s.parse::<u64>() {
                self.seed = Some(v);
            }
        }

        for (name, db) in self.databases.iter_mut() {
            let key = format!("QUARRY_DB_{}", name.to_uppercase());
            if let Some(path) = lookup(&key) {
                db.path = path;
            }
        }
    }

    pub fn source(&self, name: &str) -> Result<&SourceSpec> {
        self.sources
            .get(name)
            .ok_or_else(|| Error::Config(format!("no source configured for '{name}'")))
    }

    pub fn database(&self, name: &str) -> Result<&DatabaseConfig> {
        self.databases
            .get(name)
            .ok_or_else(|| Error::Config(format!("no database configured for '{name}'")))
    }

    pub fn query(&self, name: &str) -> Result<&str> {
        self.queries
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| Error::Config(format!("no query configured for '{name}'")))
    }

    /// Layout of the OLTP retail pipeline: six headerless pipe-delimited files.
    pub fn retail_defaults() -> Self {
        let mut cfg = Self::default();
        cfg.databases.insert(
            OLTP_DB.to_string(),
            DatabaseConfig::new("data/retail_db.sqlite"),
        );
        for (name, spec) in catalog::retail_sources() {
            cfg.sources.insert(name.to_string(), spec);
        }
        cfg
    }

    /// Layout of the star-schema warehouse pipeline.
    pub fn warehouse_defaults() -> Self {
        let mut cfg = Self::default();
        cfg.databases.insert(
            TRANSACT_DB.to_string(),
            DatabaseConfig::new("data/db_movies_netflix_transact.sqlite"),
        );
        cfg.databases.insert(
            WAREHOUSE_DB.to_string(),
            DatabaseConfig::new("data/dw_netflix.sqlite"),
        );
        for (name, spec) in catalog::warehouse_sources() {
            cfg.sources.insert(name.to_string(), spec);
        }
        cfg.queries.insert(
            warehouse::MOVIES_QUERY.to_string(),
            warehouse::DEFAULT_MOVIES_QUERY.to_string(),
        );
        cfg
    }
}
