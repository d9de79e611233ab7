//! Synthetic watch facts: every user paired with every movie, with a random
//! rating and a random viewing time in 2024.

use chrono::{DateTime, NaiveDateTime};
use quarry_core::catalog::warehouse::{FACT_WATCHS, MOVIE_ID, USER_ID};
use quarry_core::types::{Column, RowBatch, Scalar};
use rand::Rng;

use crate::error::{TransformError, ValidationError};
use crate::reshape::cross_join;
use crate::validate::column_of;

pub const RATING: &str = "rating";
pub const TIMESTAMP: &str = "timestamp";

pub const MAX_RATING: f64 = 5.0;

/// 2024-01-01 00:00:00 UTC.
pub const WINDOW_START: i64 = 1_704_067_200;
/// 2024-12-31 00:00:00 UTC, inclusive.
pub const WINDOW_END: i64 = 1_735_603_200;

/// Uniform in `[0, 5]`, rounded to one decimal.
pub fn gen_rating<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    (rng.gen_range(0.0..=MAX_RATING) * 10.0).round() / 10.0
}

/// Whole-second instant drawn uniformly from the window.
pub fn gen_timestamp<R: Rng + ?Sized>(rng: &mut R) -> NaiveDateTime {
    let secs = rng.gen_range(WINDOW_START..=WINDOW_END);
    DateTime::from_timestamp(secs, 0)
        .unwrap_or_default()
        .naive_utc()
}

/// Cross `users[userID]` with `movies[movieID]` (user-major) and draw the
/// measures independently per row.
pub fn synthesize_watch_facts<R: Rng + ?Sized>(
    users: &RowBatch,
    movies: &RowBatch,
    rng: &mut R,
) -> Result<RowBatch, TransformError> {
    build(users, movies, rng).map_err(|e| TransformError::new(FACT_WATCHS, e))
}

fn build<R: Rng + ?Sized>(
    users: &RowBatch,
    movies: &RowBatch,
    rng: &mut R,
) -> Result<RowBatch, ValidationError> {
    let mut pairs = cross_join(column_of(users, USER_ID)?, column_of(movies, MOVIE_ID)?)?;
    let n = pairs.num_rows();

    let mut ratings = Vec::with_capacity(n);
    let mut times = Vec::with_capacity(n);
    for _ in 0..n {
        ratings.push(Scalar::F64(gen_rating(rng)));
        times.push(Scalar::Timestamp(gen_timestamp(rng)));
    }
    pairs.push_column(Column::new(RATING, ratings))?;
    pairs.push_column(Column::new(TIMESTAMP, times))?;
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn keys(name: &str, n: i64) -> RowBatch {
        RowBatch::try_new(vec![Column::new(name, (1..=n).map(Scalar::I64).collect())]).unwrap()
    }

    #[test]
    fn three_users_by_four_movies_is_twelve_rows() {
        let mut rng = StdRng::seed_from_u64(7);
        let facts = synthesize_watch_facts(&keys(USER_ID, 3), &keys(MOVIE_ID, 4), &mut rng).unwrap();
        assert_eq!(facts.num_rows(), 12);
        assert_eq!(facts.column_names(), vec![USER_ID, MOVIE_ID, RATING, TIMESTAMP]);

        for v in &facts.column(RATING).unwrap().values {
            let r = v.as_f64().unwrap();
            assert!((0.0..=5.0).contains(&r));
            assert!(((r * 10.0).round() - r * 10.0).abs() < 1e-9);
        }
        for v in &facts.column(TIMESTAMP).unwrap().values {
            match v {
                Scalar::Timestamp(ts) => assert_eq!(ts.year(), 2024),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn rows_are_user_major() {
        let mut rng = StdRng::seed_from_u64(1);
        let facts = synthesize_watch_facts(&keys(USER_ID, 2), &keys(MOVIE_ID, 3), &mut rng).unwrap();
        let users: Vec<_> = facts.column(USER_ID).unwrap().values.clone();
        assert_eq!(
            users,
            [1, 1, 1, 2, 2, 2].into_iter().map(Scalar::I64).collect::<Vec<_>>()
        );
    }

    #[test]
    fn same_seed_same_facts() {
        let users = keys(USER_ID, 2);
        let movies = keys(MOVIE_ID, 2);
        let a = synthesize_watch_facts(&users, &movies, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = synthesize_watch_facts(&users, &movies, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_dimension_gives_empty_facts() {
        let mut rng = StdRng::seed_from_u64(0);
        let facts = synthesize_watch_facts(&keys(USER_ID, 0), &keys(MOVIE_ID, 4), &mut rng).unwrap();
        assert_eq!(facts.num_rows(), 0);
        assert_eq!(facts.num_columns(), 4);
    }

    #[test]
    fn window_bounds_are_2024() {
        assert_eq!(
            DateTime::from_timestamp(WINDOW_END, 0).unwrap().naive_utc().ordinal(),
            366
        );
        assert_eq!(
            DateTime::from_timestamp(WINDOW_START, 0).unwrap().naive_utc().ordinal(),
            1
        );
    }
}
