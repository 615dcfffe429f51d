#![allow(unknown_lints)]
#![allow(clippy::literal_string_with_formatting_args)]

//!  # PricingEngine
//!
//!  A concurrent pricing-task execution engine in Rust. Independent execution units, either one
//!  thread per merchant or a fixed worker pool, recompute prices for a shared product catalog,
//!  update a single shared price table, keep an audit ledger of every change and write
//!  human-readable log lines on a background thread without blocking the pricing threads.
//!
//!  ## Features
//!
//!  - Two execution modes: fixed assignment (one thread per merchant) and a worker pool fed by a task queue
//!  - Reader-writer locked price table with consistent snapshots and checksummed JSON packages
//!  - Append-only history ledger with CSV export and an optional retention window
//!  - Asynchronous single-consumer log sink with strict FIFO ordering and drain-on-close
//!  - Cooperative cancellation: stopping never interrupts a task in flight and never discards queued work
//!  - Per-task failure isolation, including panics inside the pricing function
//!  - Lock-free success, failure and total counters
//!  - Pluggable pricing function, market provider and baseline seeding policy
//!
//!  ## Execution Model
//!
//!  Every task runs through the same steps:
//!
//!  1. Read the current price; an unseen product gets a baseline from the [`SeedingPolicy`]
//!  2. Observe the market through the [`MarketProvider`]
//!  3. Call the [`PricingFunction`] with no engine lock held
//!  4. On success write the new price; on failure leave the table untouched
//!  5. Append exactly one [`PriceRecord`], emit one log line and bump the counters
//!
//!  No two of the price table, ledger, queue and sink locks are ever held at the same time.
//!
//!  ## Default Collaborators
//!
//!  - **HeuristicPricing**: weighted stock, competitor, demand and time factors, clamped to half and double the base price
//!  - **SimulatedMarket**: randomized stock levels, shopper behaviour, competitor prices and seasonality
//!  - **UniformSeeding**: baselines drawn uniformly from a configurable range (5000 to 15000 by default)
//!
//!  ## Example
//!
//!  ```no_run
//!  use pricingengine::{EngineConfig, HeuristicPricing, Merchant, Orchestrator, setup_logger};
//!  use std::sync::Arc;
//!
//!  setup_logger();
//!  let engine = Orchestrator::new(EngineConfig::default()).unwrap();
//!  engine
//!      .start_fixed(
//!          vec![
//!              Merchant::new("Apple Store", ["iPhone-15-Pro", "MacBook-Pro-14"]),
//!              Merchant::new("JD", ["RTX-4090", "iPhone-15-Pro"]),
//!          ],
//!          Arc::new(HeuristicPricing::new()),
//!      )
//!      .unwrap();
//!  engine.wait_all();
//!  engine.print_statistics();
//!  engine.export_price_trend("output/price_trend.csv").unwrap();
//!  ```
//!
//!  ## Configuration
//!
//!  [`EngineConfig`] is deserialized with `serde` and can be overridden from the environment:
//!
//!  | Variable | Field |
//!  |----------|-------|
//!  | `PRICING_LOG_PATH` | `log_path` |
//!  | `PRICING_WORKERS` | `worker_count` |
//!  | `PRICING_MIN_DELAY_MS` | `min_delay_ms` |
//!  | `PRICING_MAX_DELAY_MS` | `max_delay_ms` |
//!
//!  Console diagnostics go through `tracing`; call [`setup_logger`] once and set `LOGLEVEL` to
//!  choose the level.
//!

mod engine;
mod errors;
mod ledger;
mod logging;
mod pricing;
mod table;
mod task;
mod utils;

pub use engine::{
    EngineConfig, EngineStatistics, Latency, Orchestrator, OrchestratorBuilder, StatisticsReport,
};
pub use errors::PricingError;
pub use ledger::{CSV_COLUMNS, HistoryLedger, PriceRecord, PriceStatus};
pub use logging::AsyncLogSink;
pub use pricing::{
    FixedSeeding, HeuristicPricing, MarketProvider, MarketSnapshot, PriceBreakdown,
    PricingFunction, PricingOutcome, Product, ProductCategory, SeedingPolicy, SimulatedMarket,
    UniformSeeding,
};
pub use table::{PriceTable, PriceTableSnapshot, PriceTableSnapshotPackage, SNAPSHOT_FORMAT_VERSION};
pub use task::{Merchant, PricingTask, TaskQueue};
pub use utils::{UuidGenerator, current_time_millis, current_time_string, setup_logger};
