//! Criterion micro-benchmarks for view creation, materialization, and
//! write-through element access.

use std::hint::black_box;

use annomat_bench::{half_rows, reference_profile};
use annomat_core::SelectorSpec;
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_slice(c: &mut Criterion) {
    let root = reference_profile().unwrap();
    c.bench_function("slice_half_rows", |b| {
        b.iter(|| black_box(root.slice(half_rows(), ..).unwrap()));
    });
    c.bench_function("slice_chained_range", |b| {
        b.iter(|| {
            let outer = root.slice(SelectorSpec::range(1_000, 9_000), ..).unwrap();
            black_box(outer.slice(..4_000usize, ..500usize).unwrap())
        });
    });
}

fn bench_materialize(c: &mut Criterion) {
    let root = reference_profile().unwrap();
    c.bench_function("materialize_half_rows", |b| {
        b.iter(|| {
            let mut view = root.slice(half_rows(), ..).unwrap();
            black_box(view.materialize())
        });
    });
    c.bench_function("set_obs_column_on_view", |b| {
        b.iter(|| {
            let mut view = root.slice(half_rows(), ..).unwrap();
            view.set_obs_column("flag", vec![true; 5_000]).unwrap();
            black_box(view)
        });
    });
}

fn bench_write_through(c: &mut Criterion) {
    let root = reference_profile().unwrap();
    let view = root.slice(half_rows(), ..100usize).unwrap();
    c.bench_function("view_set_element", |b| {
        let mut i = 0usize;
        b.iter(|| {
            i = (i + 1) % view.n_obs();
            view.x().set(black_box(i), 0, 1.0).unwrap();
        });
    });
}

criterion_group!(benches, bench_slice, bench_materialize, bench_write_through);
criterion_main!(benches);
