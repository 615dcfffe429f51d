//! Lifecycle owner of the pricing engine

use crate::engine::config::EngineConfig;
use crate::engine::executor::{EngineCore, ExecutionUnit};
use crate::engine::statistics::StatisticsReport;
use crate::engine::worker::{run_merchant, run_worker};
use crate::errors::PricingError;
use crate::ledger::{HistoryLedger, PriceRecord};
use crate::logging::AsyncLogSink;
use crate::pricing::{
    MarketProvider, PricingFunction, SeedingPolicy, SimulatedMarket, UniformSeeding,
};
use crate::table::PriceTable;
use crate::task::{Merchant, PricingTask};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

struct UnitHandle {
    name: String,
    handle: JoinHandle<usize>,
}

/// Builder for [`Orchestrator`] with pluggable collaborators.
///
/// Anything left unset falls back to the configuration: a [`UniformSeeding`] over
/// `seed_min..seed_max`, a [`SimulatedMarket`] and a log file at `log_path`.
pub struct OrchestratorBuilder {
    config: EngineConfig,
    seeding: Option<Arc<dyn SeedingPolicy>>,
    market: Option<Arc<dyn MarketProvider>>,
    log_writer: Option<Box<dyn Write + Send>>,
}

impl OrchestratorBuilder {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            seeding: None,
            market: None,
            log_writer: None,
        }
    }

    /// Override the baseline policy for unseen products
    pub fn seeding(mut self, seeding: impl SeedingPolicy + 'static) -> Self {
        self.seeding = Some(Arc::new(seeding));
        self
    }

    /// Override the market snapshot provider
    pub fn market(mut self, market: impl MarketProvider + 'static) -> Self {
        self.market = Some(Arc::new(market));
        self
    }

    /// Send log lines to `writer` instead of the configured file
    pub fn log_writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.log_writer = Some(Box::new(writer));
        self
    }

    /// Validates the configuration and starts the log sink.
    pub fn build(self) -> Result<Orchestrator, PricingError> {
        self.config.validate()?;

        let seeding: Arc<dyn SeedingPolicy> = match self.seeding {
            Some(seeding) => seeding,
            None => Arc::new(UniformSeeding::new(
                self.config.seed_min,
                self.config.seed_max,
            )?),
        };
        let market: Arc<dyn MarketProvider> = match self.market {
            Some(market) => market,
            None => Arc::new(SimulatedMarket::new()),
        };

        let mut log_degraded = false;
        let sink = match self.log_writer {
            Some(writer) => AsyncLogSink::from_writer(writer)?,
            None => match AsyncLogSink::open(&self.config.log_path) {
                Ok(sink) => sink,
                Err(e) => {
                    warn!("{}; log lines will be discarded", e);
                    log_degraded = true;
                    AsyncLogSink::discard()?
                }
            },
        };

        let ledger = match self.config.ledger_capacity {
            Some(capacity) => HistoryLedger::with_capacity(capacity),
            None => HistoryLedger::new(),
        };

        let core = Arc::new(EngineCore::new(
            sink,
            ledger,
            seeding,
            market,
            self.config.latency(),
        ));
        core.sink.enqueue("=== Pricing System Started ===");
        info!("Pricing system started");

        Ok(Orchestrator {
            core,
            units: Mutex::new(Vec::new()),
            config: self.config,
            log_degraded,
        })
    }
}

/// Owns the shared engine state and the execution units working on it.
///
/// Two execution modes are available. [`start_fixed`] spawns one thread per merchant, each
/// walking its own product list. [`start_pool`] spawns a fixed number of workers draining
/// a shared queue fed through [`add_task`] and [`submit`].
///
/// Every method takes `&self`, so the orchestrator can be shared behind an `Arc` and
/// stopped from another thread. Read-only methods are safe to call while units run.
///
/// Pool workers only terminate once the queue is closed, so in pool mode
/// [`request_stop`] must precede [`wait_all`]. Dropping the orchestrator does both and
/// then drains the log sink.
///
/// [`start_fixed`]: Orchestrator::start_fixed
/// [`start_pool`]: Orchestrator::start_pool
/// [`add_task`]: Orchestrator::add_task
/// [`submit`]: Orchestrator::submit
/// [`request_stop`]: Orchestrator::request_stop
/// [`wait_all`]: Orchestrator::wait_all
pub struct Orchestrator {
    core: Arc<EngineCore>,
    units: Mutex<Vec<UnitHandle>>,
    config: EngineConfig,
    log_degraded: bool,
}

impl Orchestrator {
    /// Build an orchestrator with the default collaborators
    pub fn new(config: EngineConfig) -> Result<Self, PricingError> {
        OrchestratorBuilder::new(config).build()
    }

    pub fn builder(config: EngineConfig) -> OrchestratorBuilder {
        OrchestratorBuilder::new(config)
    }

    /// Spawns one thread per merchant. Returns the number of threads started.
    ///
    /// Merchant names must be unique. Fails with [`PricingError::InvalidOperation`] while
    /// units from a previous start have not been joined.
    pub fn start_fixed(
        &self,
        merchants: Vec<Merchant>,
        pricing: Arc<dyn PricingFunction>,
    ) -> Result<usize, PricingError> {
        let mut seen = HashSet::new();
        for merchant in &merchants {
            if !seen.insert(merchant.name.as_str()) {
                return Err(PricingError::InvalidConfig {
                    message: format!("duplicate merchant name: {}", merchant.name),
                });
            }
        }

        let mut units = self.units.lock();
        self.ensure_idle(&units)?;
        self.core.reset_stop();

        for merchant in merchants {
            let name = format!("merchant-{}", merchant.name);
            let unit = ExecutionUnit::new(Arc::clone(&self.core), Arc::clone(&pricing));
            let handle = self.spawn(&name, move || run_merchant(unit, merchant))?;
            units.push(UnitHandle { name, handle });
        }

        info!("Started {} merchant threads", units.len());
        Ok(units.len())
    }

    /// Spawns `worker_count` pool workers draining the task queue.
    pub fn start_pool(
        &self,
        worker_count: usize,
        pricing: Arc<dyn PricingFunction>,
    ) -> Result<usize, PricingError> {
        if worker_count == 0 {
            return Err(PricingError::InvalidConfig {
                message: "worker_count must be at least 1".to_string(),
            });
        }

        let mut units = self.units.lock();
        self.ensure_idle(&units)?;
        self.core.reset_stop();

        for index in 0..worker_count {
            let name = format!("worker-{index}");
            let unit = ExecutionUnit::new(Arc::clone(&self.core), Arc::clone(&pricing));
            let handle = self.spawn(&name, move || run_worker(unit))?;
            units.push(UnitHandle { name, handle });
        }

        info!("Started worker pool with {} workers", worker_count);
        Ok(worker_count)
    }

    /// Starts a pool sized by the configured `worker_count`
    pub fn start_configured_pool(
        &self,
        pricing: Arc<dyn PricingFunction>,
    ) -> Result<usize, PricingError> {
        self.start_pool(self.config.worker_count, pricing)
    }

    fn ensure_idle(&self, units: &[UnitHandle]) -> Result<(), PricingError> {
        if units.is_empty() {
            Ok(())
        } else {
            Err(PricingError::InvalidOperation {
                message: format!("{} execution units still registered", units.len()),
            })
        }
    }

    fn spawn<F>(&self, name: &str, body: F) -> Result<JoinHandle<usize>, PricingError>
    where
        F: FnOnce() -> usize + Send + 'static,
    {
        thread::Builder::new()
            .name(name.to_string())
            .spawn(body)
            .map_err(|e| PricingError::io(name, e))
    }

    /// Queue a task for the pool and wake one idle worker
    pub fn add_task(&self, task: PricingTask) {
        if self.core.queue.is_closed() {
            warn!(
                "task {} for {} queued after stop; it runs on the next pool start",
                task.id, task.product_id
            );
        }
        self.core.queue.push(task);
    }

    /// Create and queue a task, returning its id
    pub fn submit(&self, merchant: &str, product_id: &str) -> Uuid {
        let id = self.core.ids.next();
        self.add_task(PricingTask::new(id, merchant, product_id));
        id
    }

    /// Raise the cooperative stop flag and wake every idle worker.
    ///
    /// Merchant threads finish their current product and exit; pool workers drain the
    /// queue and exit. Nothing is interrupted.
    pub fn request_stop(&self) {
        if !self.core.stop_requested() {
            info!("Stop requested");
            self.core.sink.enqueue("=== Stop Requested ===");
        }
        self.core.request_stop();
    }

    /// True once [`Orchestrator::request_stop`] has been called for the current run
    pub fn stop_requested(&self) -> bool {
        self.core.stop_requested()
    }

    /// Joins every registered unit and clears the registry. Returns the number of tasks
    /// the joined units executed.
    pub fn wait_all(&self) -> usize {
        let units = std::mem::take(&mut *self.units.lock());

        let mut executed = 0;
        for unit in units {
            match unit.handle.join() {
                Ok(count) => executed += count,
                Err(_) => error!("execution unit {} panicked", unit.name),
            }
        }
        executed
    }

    /// Names of the units registered and not yet joined
    pub fn running_units(&self) -> Vec<String> {
        self.units
            .lock()
            .iter()
            .map(|unit| unit.name.clone())
            .collect()
    }

    /// Tasks waiting in the pool queue
    pub fn pending_tasks(&self) -> usize {
        self.core.queue.len()
    }

    /// Consistent copy of the price table
    pub fn snapshot(&self) -> BTreeMap<String, f64> {
        self.core.table.snapshot()
    }

    /// Checksummed JSON package of the price table
    pub fn snapshot_json(&self) -> Result<String, PricingError> {
        self.core.table.snapshot_package()?.to_json()
    }

    pub fn statistics(&self) -> StatisticsReport {
        self.core.stats.report(&self.core.table)
    }

    /// Reports the current statistics through `tracing` and the log sink
    pub fn print_statistics(&self) -> StatisticsReport {
        let report = self.statistics();
        info!("=== Pricing Statistics ===");
        for line in report.to_string().lines() {
            info!("{}", line);
        }
        self.core.sink.enqueue(format!(
            "=== Statistics === total={} success={} failed={} products={}",
            report.total_tasks, report.successful, report.failed, report.unique_products
        ));
        debug!(
            "{} log lines pending, {} written",
            self.core.sink.pending(),
            self.core.sink.written()
        );
        report
    }

    /// Exports the ledger as CSV to `path`. Failures are logged and returned.
    pub fn export_price_trend(&self, path: impl AsRef<Path>) -> Result<usize, PricingError> {
        self.core.ledger.export_csv(path).inspect_err(|e| {
            warn!("price trend export failed: {}", e);
        })
    }

    /// Exports the ledger as CSV into an arbitrary writer
    pub fn export_history_to<W: Write>(&self, writer: W) -> Result<usize, PricingError> {
        self.core.ledger.export_to(writer).inspect_err(|e| {
            warn!("history export failed: {}", e);
        })
    }

    /// Retained ledger records in append order
    pub fn history(&self) -> Vec<PriceRecord> {
        self.core.ledger.records()
    }

    pub fn price_table(&self) -> &PriceTable {
        &self.core.table
    }

    pub fn ledger(&self) -> &HistoryLedger {
        &self.core.ledger
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// True when the configured log file could not be opened and lines are discarded
    pub fn log_degraded(&self) -> bool {
        self.log_degraded
    }

    /// Stops and joins every unit and returns the final statistics. The log sink drains
    /// when the orchestrator is dropped at the end of this call.
    pub fn shutdown(self) -> StatisticsReport {
        self.finish();
        self.statistics()
    }

    fn finish(&self) {
        self.request_stop();
        self.wait_all();
        let report = self.statistics();
        self.core.sink.enqueue(format!(
            "=== Pricing System Stopped === total={} success={} failed={}",
            report.total_tasks, report.successful, report.failed
        ));
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        let joined = self.units.lock().is_empty();
        if !self.core.stop_requested() || !joined {
            self.finish();
        }
    }
}
