mod ledger;
mod operations;

use criterion::Criterion;

pub fn register_benchmarks(c: &mut Criterion) {
    operations::register_benchmarks(c);
    ledger::register_benchmarks(c);
}
