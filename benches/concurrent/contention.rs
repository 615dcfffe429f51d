use criterion::{BenchmarkId, Criterion};
use pricingengine::{
    EngineConfig, MarketSnapshot, Orchestrator, PriceTable, PricingError,
    PricingOutcome, PricingTask, Product, TaskQueue, UuidGenerator,
};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Register benchmarks that test different contention patterns
pub fn register_contention_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("PriceTable - Contention Patterns");

    for read_ratio in [0, 25, 50, 75, 95].iter() {
        let thread_count = 8;

        group.bench_with_input(
            BenchmarkId::new("read_write_ratio", read_ratio),
            read_ratio,
            |b, &read_ratio| {
                b.iter_custom(|iters| {
                    measure_read_write_contention(thread_count, iters, read_ratio)
                });
            },
        );
    }

    for hot_spot_percentage in [0, 20, 50, 80, 100].iter() {
        let thread_count = 8;

        group.bench_with_input(
            BenchmarkId::new("hot_spot_contention", hot_spot_percentage),
            hot_spot_percentage,
            |b, &hot_spot_percentage| {
                b.iter_custom(|iters| {
                    measure_hot_spot_contention(thread_count, iters, hot_spot_percentage)
                });
            },
        );
    }

    group.finish();

    let mut group = c.benchmark_group("TaskQueue - Producers and Consumers");
    for consumer_count in [1, 2, 4, 8].iter() {
        group.bench_with_input(
            BenchmarkId::new("drain", consumer_count),
            consumer_count,
            |b, &consumer_count| {
                b.iter_custom(|iters| measure_queue_drain(consumer_count, iters));
            },
        );
    }
    group.finish();

    let mut group = c.benchmark_group("Orchestrator - Worker Pool");
    group.sample_size(10);
    for worker_count in [1, 4, 8].iter() {
        group.bench_with_input(
            BenchmarkId::new("pool_1000_tasks", worker_count),
            worker_count,
            |b, &worker_count| {
                b.iter(|| run_pool(worker_count, 1_000));
            },
        );
    }
    group.finish();
}

/// read_ratio = percentage of read operations (0-100)
fn measure_read_write_contention(
    thread_count: usize,
    iterations: u64,
    read_ratio: u64,
) -> Duration {
    let table = Arc::new(PriceTable::new());
    for i in 0..100 {
        table.set(&format!("product-{i}"), 1_000.0);
    }
    let barrier = Arc::new(Barrier::new(thread_count + 1));

    let mut handles = Vec::with_capacity(thread_count);
    for thread_id in 0..thread_count {
        let table = Arc::clone(&table);
        let barrier = Arc::clone(&barrier);

        handles.push(thread::spawn(move || {
            barrier.wait();
            for i in 0..iterations {
                let product = format!("product-{}", (thread_id as u64 * 7 + i) % 100);
                if i % 100 < read_ratio {
                    std::hint::black_box(table.get(&product));
                } else {
                    table.set(&product, 1_000.0 + i as f64);
                }
            }
        }));
    }

    barrier.wait();
    let start = Instant::now();
    for handle in handles {
        handle.join().unwrap();
    }
    start.elapsed()
}

/// Share of writes that land on a single hot product
fn measure_hot_spot_contention(
    thread_count: usize,
    iterations: u64,
    hot_spot_percentage: u64,
) -> Duration {
    let table = Arc::new(PriceTable::new());
    let barrier = Arc::new(Barrier::new(thread_count + 1));

    let mut handles = Vec::with_capacity(thread_count);
    for thread_id in 0..thread_count {
        let table = Arc::clone(&table);
        let barrier = Arc::clone(&barrier);

        handles.push(thread::spawn(move || {
            barrier.wait();
            for i in 0..iterations {
                let product = if i % 100 < hot_spot_percentage {
                    "hot".to_string()
                } else {
                    format!("cold-{thread_id}-{}", i % 64)
                };
                table.update_if_lower(&product, 10_000.0 - (i % 1_000) as f64);
            }
        }));
    }

    barrier.wait();
    let start = Instant::now();
    for handle in handles {
        handle.join().unwrap();
    }
    start.elapsed()
}

fn measure_queue_drain(consumer_count: usize, iterations: u64) -> Duration {
    let queue = Arc::new(TaskQueue::new());
    let ids = UuidGenerator::new(Uuid::new_v4());

    let start = Instant::now();
    let consumers: Vec<_> = (0..consumer_count)
        .map(|_| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                let mut popped = 0u64;
                while queue.pop().is_some() {
                    popped += 1;
                }
                popped
            })
        })
        .collect();

    for i in 0..iterations {
        queue.push(PricingTask::new(ids.next(), "bench", format!("product-{}", i % 16)));
    }
    queue.close();

    let popped: u64 = consumers.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(popped, iterations);
    start.elapsed()
}

fn run_pool(worker_count: usize, tasks: usize) {
    let config = EngineConfig::default()
        .with_latency(0, 0)
        .with_seed_range(900.0, 1_100.0);
    let engine = Orchestrator::builder(config)
        .log_writer(std::io::sink())
        .build()
        .unwrap();

    engine
        .start_pool(
            worker_count,
            Arc::new(
                |product: &Product, _: &MarketSnapshot| -> Result<PricingOutcome, PricingError> {
                    Ok(PricingOutcome::new(
                        product.base_price * 0.99,
                        product.base_price,
                        "bench",
                    ))
                },
            ),
        )
        .unwrap();

    for i in 0..tasks {
        engine.submit("bench", &format!("product-{}", i % 32));
    }
    engine.request_stop();
    engine.wait_all();
}
