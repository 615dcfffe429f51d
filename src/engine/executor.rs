//! Turning one task into a price update, an audit row and a log line

use crate::engine::config::Latency;
use crate::engine::statistics::EngineStatistics;
use crate::errors::PricingError;
use crate::ledger::{HistoryLedger, PriceRecord};
use crate::logging::AsyncLogSink;
use crate::pricing::{MarketProvider, PricingFunction, PricingOutcome, SeedingPolicy};
use crate::table::PriceTable;
use crate::task::{PricingTask, TaskQueue};
use crate::utils::UuidGenerator;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// State shared by the orchestrator and every running unit.
pub(crate) struct EngineCore {
    pub(crate) table: PriceTable,
    pub(crate) ledger: HistoryLedger,
    pub(crate) sink: AsyncLogSink,
    pub(crate) stats: EngineStatistics,
    pub(crate) queue: TaskQueue,
    pub(crate) ids: UuidGenerator,
    pub(crate) seeding: Arc<dyn SeedingPolicy>,
    pub(crate) market: Arc<dyn MarketProvider>,
    pub(crate) latency: Latency,
    stop: AtomicBool,
}

impl EngineCore {
    pub(crate) fn new(
        sink: AsyncLogSink,
        ledger: HistoryLedger,
        seeding: Arc<dyn SeedingPolicy>,
        market: Arc<dyn MarketProvider>,
        latency: Latency,
    ) -> Self {
        Self {
            table: PriceTable::new(),
            ledger,
            sink,
            stats: EngineStatistics::new(),
            queue: TaskQueue::new(),
            ids: UuidGenerator::default(),
            seeding,
            market,
            latency,
            stop: AtomicBool::new(false),
        }
    }

    pub(crate) fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Raise the stop flag and close the queue so idle workers wake up
    pub(crate) fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
        self.queue.close();
    }

    /// Clear the stop flag before a new batch of units starts
    pub(crate) fn reset_stop(&self) {
        self.stop.store(false, Ordering::Release);
        self.queue.reopen();
    }
}

/// Executes pricing tasks against the shared engine state.
///
/// At most one of the table, ledger, queue and sink locks is held at any time, and the
/// pricing function runs with none of them held.
pub(crate) struct ExecutionUnit {
    core: Arc<EngineCore>,
    pricing: Arc<dyn PricingFunction>,
}

impl ExecutionUnit {
    pub(crate) fn new(core: Arc<EngineCore>, pricing: Arc<dyn PricingFunction>) -> Self {
        Self { core, pricing }
    }

    pub(crate) fn core(&self) -> &EngineCore {
        &self.core
    }

    /// Runs one task to completion: price update on success, one ledger row and one counter
    /// update in every case. Returns the finished task.
    ///
    /// A panic raised while seeding, observing the market or pricing is caught here and
    /// recorded as a failure of this task only.
    pub(crate) fn run_task(&self, mut task: PricingTask) -> PricingTask {
        let product_id = task.product_id.clone();
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.execute(&mut task)))
            .unwrap_or_else(|payload| Err(panic_error(product_id, payload)));

        match result {
            Ok(outcome) => {
                task.complete(outcome.new_price);
                let line = format!(
                    "[{}] {}: {:.2} -> {:.2} ({:+.2}%)",
                    task.merchant,
                    task.product_id,
                    task.base_price,
                    task.adjusted_price,
                    task.adjustment_rate()
                );
                info!("{}", line);
                debug!("{}", outcome.explanation);
                self.core
                    .sink
                    .enqueue(format!("{line} | {}", outcome.explanation));
            }
            Err(error) => {
                task.fail(error.to_string());
                let line = format!(
                    "[ERROR] {} - {}: {}",
                    task.merchant, task.product_id, error
                );
                warn!("{}", line);
                self.core.sink.enqueue(line);
            }
        }

        self.core.ledger.append(PriceRecord::from_task(&task));
        self.core.stats.record(task.success);
        task
    }

    fn execute(&self, task: &mut PricingTask) -> Result<PricingOutcome, PricingError> {
        let current = self.core.table.get(&task.product_id);
        task.base_price = if current == 0.0 {
            self.core.seeding.seed(&task.product_id)
        } else {
            current
        };

        let (product, market) = self
            .core
            .market
            .observe(&task.product_id, task.base_price)?;
        task.stock_level = product.stock;

        let outcome = self.pricing.price(&product, &market)?;
        if !outcome.new_price.is_finite() || outcome.new_price <= 0.0 {
            return Err(PricingError::InvalidPrice {
                product: task.product_id.clone(),
                price: outcome.new_price,
            });
        }

        self.core.table.set(&task.product_id, outcome.new_price);
        Ok(outcome)
    }
}

fn panic_error(product: String, payload: Box<dyn Any + Send>) -> PricingError {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    PricingError::PricingFailed {
        product,
        message: format!("task panicked: {message}"),
    }
}
