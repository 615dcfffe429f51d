// demos/src/bin/worker_pool.rs - Worker pool fed through the task queue

use pricingengine::{
    EngineConfig, HeuristicPricing, Orchestrator, PriceTable, PricingTask, setup_logger,
};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{error, info};
use uuid::Uuid;

const CATALOG: [&str; 6] = [
    "iPhone-15-Pro",
    "iPhone-15-Pro-Max",
    "MacBook-Pro-14",
    "MacBook-Pro-16",
    "RTX-4080",
    "RTX-4090",
];
const MERCHANTS: [&str; 3] = ["JD", "Tmall", "Suning"];
const ROUNDS: usize = 5;

fn main() {
    setup_logger();
    info!("Worker Pool Pricing Demo");
    info!("========================");

    let config = match EngineConfig::default().apply_env_overrides() {
        Ok(config) => config.with_latency(5, 20).with_ledger_capacity(10_000),
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    let engine = match Orchestrator::new(config) {
        Ok(engine) => Arc::new(engine),
        Err(e) => {
            error!("Failed to start the pricing system: {}", e);
            return;
        }
    };

    let workers = match engine.start_configured_pool(Arc::new(HeuristicPricing::new())) {
        Ok(workers) => workers,
        Err(e) => {
            error!("Failed to start the worker pool: {}", e);
            return;
        }
    };
    info!("Running {} workers: {:?}", workers, engine.running_units());

    let start = Instant::now();

    // A second producer submitting tasks with caller-chosen ids
    let producer = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for product in CATALOG {
                engine.add_task(PricingTask::new(Uuid::new_v4(), "Pinduoduo", product));
            }
        })
    };

    for round in 0..ROUNDS {
        for (i, product) in CATALOG.iter().enumerate() {
            engine.submit(MERCHANTS[(round + i) % MERCHANTS.len()], product);
        }
        info!(
            "Round {} submitted, {} tasks pending",
            round + 1,
            engine.pending_tasks()
        );
        thread::sleep(Duration::from_millis(50));

        let report = engine.statistics();
        info!(
            "Progress: {} tasks done ({} ok, {} failed)",
            report.total_tasks, report.successful, report.failed
        );
    }

    if producer.join().is_err() {
        error!("Producer thread panicked");
    }

    engine.request_stop();
    let executed = engine.wait_all();
    info!("Pool drained {} tasks in {:?}", executed, start.elapsed());

    engine.print_statistics();

    let failed: Vec<_> = engine
        .history()
        .into_iter()
        .filter(|record| !record.is_success())
        .collect();
    info!("{} failed tasks in the ledger", failed.len());
    for record in failed.iter().take(3) {
        info!("  {} - {}", record.merchant, record.product_id);
    }

    let mut buffer = Vec::new();
    match engine.export_history_to(&mut buffer) {
        Ok(rows) => {
            info!("Last ledger rows ({} total):", rows);
            let text = String::from_utf8_lossy(&buffer);
            let lines: Vec<&str> = text.lines().collect();
            for line in lines.iter().skip(lines.len().saturating_sub(5)) {
                info!("  {}", line);
            }
        }
        Err(e) => error!("History export failed: {}", e),
    }

    match engine
        .snapshot_json()
        .and_then(|json| PriceTable::from_snapshot_json(&json).map(|table| (json.len(), table)))
    {
        Ok((bytes, restored)) => info!(
            "Snapshot package: {} bytes, {} products restored",
            bytes,
            restored.size()
        ),
        Err(e) => error!("Snapshot round trip failed: {}", e),
    }
}
