use criterion::{criterion_group, criterion_main};

mod concurrent;
mod price_table;

use concurrent::register_benchmarks as register_concurrent_benchmarks;
use price_table::register_benchmarks as register_price_table_benchmarks;

criterion_group!(
    benches,
    register_price_table_benchmarks,
    register_concurrent_benchmarks,
);

criterion_main!(benches);
