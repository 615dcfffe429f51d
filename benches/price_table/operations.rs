use criterion::{BenchmarkId, Criterion};
use pricingengine::PriceTable;
use std::hint::black_box;

/// Single-threaded cost of the price table operations
pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("PriceTable - Operations");

    for size in [10usize, 100, 1_000].iter() {
        let table = populated_table(*size);

        group.bench_with_input(BenchmarkId::new("get", size), size, |b, &size| {
            let mut i = 0usize;
            b.iter(|| {
                i = (i + 1) % size;
                black_box(table.get(&product_id(i)))
            })
        });

        group.bench_with_input(BenchmarkId::new("set", size), size, |b, &size| {
            let mut i = 0usize;
            b.iter(|| {
                i = (i + 1) % size;
                table.set(&product_id(i), black_box(100.0 + i as f64));
            })
        });

        group.bench_with_input(
            BenchmarkId::new("update_if_lower", size),
            size,
            |b, &size| {
                let mut i = 0usize;
                b.iter(|| {
                    i = (i + 1) % size;
                    black_box(table.update_if_lower(&product_id(i), 50.0))
                })
            },
        );

        group.bench_with_input(BenchmarkId::new("snapshot", size), size, |b, _| {
            b.iter(|| black_box(table.snapshot()))
        });

        group.bench_with_input(BenchmarkId::new("price_range", size), size, |b, _| {
            b.iter(|| black_box(table.price_range()))
        });
    }

    group.bench_function("snapshot_package_json", |b| {
        let table = populated_table(100);
        b.iter(|| {
            let package = table.snapshot_package().unwrap();
            black_box(package.to_json().unwrap())
        })
    });

    group.finish();
}

fn product_id(i: usize) -> String {
    format!("product-{i}")
}

fn populated_table(size: usize) -> PriceTable {
    let table = PriceTable::new();
    for i in 0..size {
        table.set(&product_id(i), 1_000.0 + i as f64);
    }
    table
}
