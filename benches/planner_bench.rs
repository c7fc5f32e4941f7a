use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use tpcc_dumpgen::catalog::CATALOG;
use tpcc_dumpgen::planner;

fn bench_plan(c: &mut Criterion) {
    c.bench_function("plan_stock_10k_warehouses", |b| {
        b.iter(|| planner::plan(black_box(10_000), 8, 1000).unwrap());
    });
}

fn bench_resolve_catalog(c: &mut Criterion) {
    c.bench_function("resolve_catalog_10k_warehouses", |b| {
        b.iter(|| {
            CATALOG
                .iter()
                .map(|spec| spec.resolve(black_box(10_000)).unwrap().total_rows())
                .sum::<u64>()
        });
    });
}

criterion_group!(benches, bench_plan, bench_resolve_catalog);
criterion_main!(benches);
