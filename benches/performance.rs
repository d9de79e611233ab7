use criterion::{criterion_group, criterion_main, Criterion};
use quarry_core::prelude::*;
use quarry_operators::fact::synthesize_watch_facts;
use quarry_operators::reshape::cross_join;
use quarry_operators::validate_references;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn make_keys(name: &str, rows: usize) -> RowBatch {
    RowBatch {
        columns: vec![Column {
            name: name.into(),
            values: (0..rows as i64).map(Scalar::I64).collect(),
        }],
    }
}

fn make_children(rows: usize, parents: usize) -> RowBatch {
    RowBatch {
        columns: vec![Column {
            name: "fk".into(),
            values: (0..rows).map(|i| Scalar::I64((i % parents) as i64)).collect(),
        }],
    }
}

fn bench_validate_references(c: &mut Criterion) {
    let parents = make_keys("pk", 10_000);
    let children = make_children(100_000, 10_000);
    c.bench_function("validate_references_100k", |b| {
        b.iter(|| validate_references(&children, &parents, "fk", "pk").unwrap())
    });
}

fn bench_cross_join(c: &mut Criterion) {
    let users = make_keys("userID", 300);
    let movies = make_keys("movieID", 300);
    c.bench_function("cross_join_300x300", |b| {
        b.iter(|| {
            cross_join(
                users.column("userID").unwrap(),
                movies.column("movieID").unwrap(),
            )
            .unwrap()
        })
    });
    c.bench_function("watch_facts_300x300", |b| {
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| synthesize_watch_facts(&users, &movies, &mut rng).unwrap())
    });
}

criterion_group!(operators, bench_validate_references, bench_cross_join);
criterion_main!(operators);
