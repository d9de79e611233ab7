//! Movie warehouse dimensions: awards, movies and users.

use quarry_core::catalog::warehouse::{
    AWARD, AWARD_COLUMNS, AWARD_ID, AWARD_MOVIE, AWARD_RAW, MOVIES_QUERY, MOVIE_AWARDS,
    MOVIE_COLUMNS, MOVIE_ID, RELEASE_MOVIE, USERS, USER_COLUMNS, USER_ID, USER_RAW_ID,
};
use quarry_core::types::RowBatch;

use super::Tagged;
use crate::error::{TransformError, ValidationError};
use crate::reshape::{coerce_to_int, drop_columns, inner_join, rename_columns};
use crate::validate::{validate_not_null, validate_references, validate_unique};

pub fn transform_movie_awards(batch: RowBatch) -> Result<RowBatch, TransformError> {
    run(MOVIE_AWARDS, || {
        validate_unique(&batch, MOVIE_ID)?;
        validate_not_null(&batch, &AWARD_COLUMNS)?;
        let batch = coerce_to_int(batch, MOVIE_ID)?;
        rename_columns(batch, &[(AWARD_RAW, AWARD)])
    })
}

/// Validate the movie query result, check that every award points at a
/// known movie, then join the awards in and rename to warehouse names.
///
/// The reference check runs before the join so an orphan award fails the
/// run instead of being dropped by the inner join.
pub fn transform_movies(batch: RowBatch, awards: &RowBatch) -> Result<RowBatch, TransformError> {
    run(MOVIES_QUERY, || {
        validate_unique(&batch, MOVIE_ID)?;
        validate_not_null(&batch, &MOVIE_COLUMNS)?;
        let batch = coerce_to_int(batch, MOVIE_ID)?;
        validate_references(awards, &batch, MOVIE_ID, MOVIE_ID)?;
        let joined = inner_join(&batch, awards, MOVIE_ID)?;
        shape_movie_dimension(joined)
    })
}

/// Warehouse-facing names for the joined movie table. Safe to reapply.
pub fn shape_movie_dimension(batch: RowBatch) -> Result<RowBatch, ValidationError> {
    let batch = rename_columns(
        batch,
        &[(MOVIE_COLUMNS[2], RELEASE_MOVIE), (AWARD, AWARD_MOVIE)],
    )?;
    Ok(drop_columns(batch, &[AWARD_ID]))
}

pub fn transform_users(batch: RowBatch) -> Result<RowBatch, TransformError> {
    run(USERS, || {
        validate_unique(&batch, USER_RAW_ID)?;
        validate_not_null(&batch, &USER_COLUMNS)?;
        rename_columns(batch, &[(USER_RAW_ID, USER_ID)])
    })
}

fn run(
    entity: &'static str,
    steps: impl FnOnce() -> Result<RowBatch, ValidationError>,
) -> Result<RowBatch, TransformError> {
    steps().entity(entity)
}
