//! Retail OLTP pipeline: six delimited files into the `oltp` database.

use std::collections::BTreeMap;

use quarry_core::catalog::retail::*;
use quarry_core::config::{PipelineConfig, OLTP_DB};
use quarry_core::schema::EntityTable;
use quarry_operators::entities::retail as transform;

use super::{entity, read_source, stage, Pipeline};
use crate::error::ExecError;
use crate::report::Reporter;

#[derive(Debug, Default, Clone, Copy)]
pub struct RetailPipeline;

impl Pipeline for RetailPipeline {
    fn name(&self) -> &'static str {
        "retail"
    }

    fn load_order(&self) -> &'static [&'static str] {
        &LOAD_ORDER
    }

    fn sink_database(&self) -> &'static str {
        OLTP_DB
    }

    fn defaults(&self) -> PipelineConfig {
        PipelineConfig::retail_defaults()
    }

    fn prepare(
        &self,
        config: &PipelineConfig,
        reporter: &mut dyn Reporter,
    ) -> Result<BTreeMap<String, EntityTable>, ExecError> {
        let departments = stage(reporter, DEPARTMENTS, || {
            Ok(transform::transform_departments(read_source(config, DEPARTMENTS)?)?)
        })?;
        let categories = stage(reporter, CATEGORIES, || {
            Ok(transform::transform_categories(read_source(config, CATEGORIES)?)?)
        })?;
        let customers = stage(reporter, CUSTOMERS, || {
            Ok(transform::transform_customers(read_source(config, CUSTOMERS)?)?)
        })?;
        let products = stage(reporter, PRODUCTS, || {
            Ok(transform::transform_products(
                read_source(config, PRODUCTS)?,
                &categories,
            )?)
        })?;
        let orders = stage(reporter, ORDERS, || {
            Ok(transform::transform_orders(
                read_source(config, ORDERS)?,
                &customers,
            )?)
        })?;
        let (order_items, healed) = stage(reporter, ORDER_ITEMS, || {
            Ok(transform::transform_order_items(
                read_source(config, ORDER_ITEMS)?,
                &orders,
                &products,
            )?)
        })?;
        if let Some(healed) = &healed {
            reporter.healed(ORDER_ITEMS, healed);
        }

        Ok(BTreeMap::from([
            entity(reporter, DEPARTMENTS, Some(DEPARTMENT_COLUMNS[0]), departments)?,
            entity(reporter, CATEGORIES, Some(CATEGORY_COLUMNS[0]), categories)?,
            entity(reporter, CUSTOMERS, Some(CUSTOMER_COLUMNS[0]), customers)?,
            entity(reporter, PRODUCTS, Some(PRODUCT_COLUMNS[0]), products)?,
            entity(reporter, ORDERS, Some(ORDER_COLUMNS[0]), orders)?,
            entity(reporter, ORDER_ITEMS, Some(ORDER_ITEM_COLUMNS[0]), order_items)?,
        ]))
    }
}
