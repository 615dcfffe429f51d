use criterion::{BenchmarkId, Criterion};
use pricingengine::{HistoryLedger, PriceRecord, PricingTask};
use std::hint::black_box;
use std::io;
use uuid::Uuid;

/// Append and export cost of the history ledger
pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("HistoryLedger - Operations");

    group.bench_function("append_unbounded", |b| {
        let ledger = HistoryLedger::new();
        let record = sample_record(0);
        b.iter(|| ledger.append(black_box(record.clone())))
    });

    group.bench_function("append_bounded_1000", |b| {
        let ledger = HistoryLedger::with_capacity(1_000);
        let record = sample_record(0);
        b.iter(|| ledger.append(black_box(record.clone())))
    });

    for rows in [100usize, 1_000].iter() {
        let ledger = HistoryLedger::new();
        for i in 0..*rows {
            ledger.append(sample_record(i));
        }

        group.bench_with_input(BenchmarkId::new("export_csv", rows), rows, |b, _| {
            b.iter(|| black_box(ledger.export_to(io::sink()).unwrap()))
        });
    }

    group.finish();
}

fn sample_record(i: usize) -> PriceRecord {
    let mut task = PricingTask::new(Uuid::new_v4(), "bench", format!("product-{}", i % 50));
    task.base_price = 100.0;
    task.stock_level = 120;
    task.complete(104.5);
    PriceRecord::from_task(&task)
}
