//! Movie warehouse pipeline: award file, movie query and user file into
//! `dimMovie`, `dimUser` and the synthetic `FactWatchs`.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;

use quarry_core::catalog::warehouse::*;
use quarry_core::config::{PipelineConfig, TRANSACT_DB, WAREHOUSE_DB};
use quarry_core::schema::EntityTable;
use quarry_io::{open_database, read_query, Access};
use quarry_operators::entities::warehouse as transform;
use quarry_operators::fact::synthesize_watch_facts;

use super::{entity, read_source, stage, Pipeline};
use crate::error::ExecError;
use crate::report::Reporter;

#[derive(Debug, Default, Clone, Copy)]
pub struct WarehousePipeline;

impl Pipeline for WarehousePipeline {
    fn name(&self) -> &'static str {
        "warehouse"
    }

    fn load_order(&self) -> &'static [&'static str] {
        &LOAD_ORDER
    }

    fn sink_database(&self) -> &'static str {
        WAREHOUSE_DB
    }

    fn defaults(&self) -> PipelineConfig {
        PipelineConfig::warehouse_defaults()
    }

    fn prepare(
        &self,
        config: &PipelineConfig,
        reporter: &mut dyn Reporter,
    ) -> Result<BTreeMap<String, EntityTable>, ExecError> {
        let awards = stage(reporter, MOVIE_AWARDS, || {
            Ok(transform::transform_movie_awards(read_source(config, MOVIE_AWARDS)?)?)
        })?;
        let movies = stage(reporter, DIM_MOVIE, || {
            let db = config.database(TRANSACT_DB)?;
            let conn = open_database(db, Access::ReadOnly).map_err(ExecError::Connection)?;
            let raw = read_query(&conn, config.query(MOVIES_QUERY)?).map_err(|source| {
                ExecError::Read {
                    entity: MOVIES_QUERY.to_string(),
                    source,
                }
            })?;
            Ok(transform::transform_movies(raw, &awards)?)
        })?;
        let users = stage(reporter, DIM_USER, || {
            Ok(transform::transform_users(read_source(config, USERS)?)?)
        })?;

        let mut rng = fact_rng(config.seed);
        let facts = stage(reporter, FACT_WATCHS, || {
            Ok(synthesize_watch_facts(&users, &movies, &mut rng)?)
        })?;

        Ok(BTreeMap::from([
            entity(reporter, DIM_MOVIE, Some(MOVIE_ID), movies)?,
            entity(reporter, DIM_USER, Some(USER_ID), users)?,
            entity(reporter, FACT_WATCHS, None, facts)?,
        ]))
    }
}

fn fact_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
