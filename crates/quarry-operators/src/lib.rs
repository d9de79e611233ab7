#![forbid(unsafe_code)]
//! quarry-operators: the validation-and-transform engine.
//!
//! Design intent:
//! - Everything here is pure and synchronous: batches in, batches or a
//!   `ValidationError` out. Nothing logs and nothing exits; reporting is
//!   the driver's job.
//! - `validate` holds the reusable checks, `reshape` the column-level
//!   primitives, `entities` composes both per business entity, and `fact`
//!   builds the synthetic fact table.

pub mod entities;
pub mod error;
pub mod fact;
pub mod reshape;
pub mod validate;

pub use error::{Healed, TransformError, ValidationError};
pub use validate::{validate_not_null, validate_references, validate_unique};
