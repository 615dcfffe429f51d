mod contention;

use criterion::Criterion;

pub fn register_benchmarks(c: &mut Criterion) {
    contention::register_contention_benchmarks(c);
}
