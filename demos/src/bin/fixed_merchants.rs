// demos/src/bin/fixed_merchants.rs - One thread per merchant over a shared catalog

use pricingengine::{EngineConfig, HeuristicPricing, Merchant, Orchestrator, setup_logger};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

fn main() {
    setup_logger();
    info!("Multi-threaded Pricing System Demo");
    info!("==================================");

    // optional JSON config file as the first argument
    let base = match std::env::args().nth(1) {
        Some(path) => match EngineConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load {}: {}", path, e);
                return;
            }
        },
        None => EngineConfig::default(),
    };

    let config = match base.apply_env_overrides() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };
    let log_path = config.log_path.clone();

    let engine = match Orchestrator::new(config) {
        Ok(engine) => engine,
        Err(e) => {
            error!("Failed to start the pricing system: {}", e);
            return;
        }
    };

    let merchants = vec![
        Merchant::new(
            "Apple Store",
            ["iPhone-15-Pro", "iPhone-15-Pro-Max", "MacBook-Pro-14"],
        )
        .with_priority(1),
        Merchant::new("JD", ["iPhone-15-Pro", "MacBook-Pro-14", "RTX-4090"]).with_priority(2),
        Merchant::new("Tmall", ["iPhone-15-Pro-Max", "RTX-4090", "MacBook-Pro-16"])
            .with_priority(2),
        Merchant::new("Suning", ["MacBook-Pro-14", "MacBook-Pro-16", "RTX-4080"])
            .with_priority(3),
        Merchant::new("Pinduoduo", ["iPhone-15-Pro", "RTX-4080", "RTX-4090"]).with_priority(4),
    ];

    info!("Merchants and products:");
    for merchant in &merchants {
        info!("  {} (priority {})", merchant.name, merchant.priority);
        for product in &merchant.products {
            info!("    - {}", product);
        }
    }

    let start = Instant::now();
    if let Err(e) = engine.start_fixed(merchants, Arc::new(HeuristicPricing::new())) {
        error!("Failed to start merchants: {}", e);
        return;
    }

    info!("Waiting for every pricing task to finish...");
    let executed = engine.wait_all();
    info!("{} tasks finished in {:?}", executed, start.elapsed());

    engine.print_statistics();

    info!("Final prices:");
    for (product, price) in engine.snapshot() {
        info!("  {:<20} {:>10.2}", product, price);
    }

    info!("iPhone-15-Pro history:");
    for record in engine.ledger().records_for("iPhone-15-Pro") {
        info!(
            "  {} {:<12} {:>10.2} -> {:>10.2} ({:+.2}%) {}",
            record.timestamp,
            record.merchant,
            record.original_price,
            record.adjusted_price,
            record.adjustment_rate,
            record.status
        );
    }

    match engine.export_price_trend("output/price_trend.csv") {
        Ok(rows) => info!("Price trend: output/price_trend.csv ({} rows)", rows),
        Err(e) => error!("Export failed: {}", e),
    }
    info!("Log file: {}", log_path.display());

    if engine.log_degraded() {
        error!("The log file could not be opened; log lines were discarded");
    }
}
