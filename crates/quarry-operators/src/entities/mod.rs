//! Per-entity transformers.
//!
//! Each transformer takes its raw batch by value, plus finished parent
//! batches by reference, and returns the load-ready batch. Checks run in a
//! fixed order: uniqueness, required fields, coercions, references, reshaping.
//! The first failure is returned tagged with the entity name.

pub mod retail;
pub mod warehouse;

use crate::error::{TransformError, ValidationError};

pub(crate) trait Tagged<T> {
    fn entity(self, entity: &'static str) -> Result<T, TransformError>;
}

impl<T> Tagged<T> for Result<T, ValidationError> {
    fn entity(self, entity: &'static str) -> Result<T, TransformError> {
        self.map_err(|e| TransformError::new(entity, e))
    }
}
