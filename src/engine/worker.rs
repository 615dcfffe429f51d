//! Thread bodies for the two execution modes

use crate::engine::executor::ExecutionUnit;
use crate::task::{Merchant, PricingTask};
use std::thread;
use tracing::info;

fn thread_label() -> String {
    thread::current()
        .name()
        .unwrap_or("unnamed")
        .to_string()
}

/// Fixed-assignment mode: walk the merchant's products in order.
///
/// The stop flag is checked before each product; the product in flight when the flag is
/// raised is always finished. Returns the number of tasks executed.
pub(crate) fn run_merchant(unit: ExecutionUnit, merchant: Merchant) -> usize {
    let label = thread_label();
    let core = unit.core();
    core.sink.enqueue(format!("[{label}] Started"));
    info!("[{}] Started with {} products", label, merchant.product_count());

    let mut executed = 0;
    for product in &merchant.products {
        if core.stop_requested() {
            core.sink.enqueue(format!("[{label}] Stopped by signal"));
            info!("[{}] Stopped by signal after {} tasks", label, executed);
            return executed;
        }

        let task = PricingTask::new(core.ids.next(), merchant.name.as_str(), product.as_str());
        unit.run_task(task);
        executed += 1;
        core.latency.pause();
    }

    core.sink.enqueue(format!("[{label}] Completed"));
    info!("[{}] Completed {} tasks", label, executed);
    executed
}

/// Pool mode: pull tasks until the queue is closed and drained.
pub(crate) fn run_worker(unit: ExecutionUnit) -> usize {
    let label = thread_label();
    let core = unit.core();
    info!("[{}] Waiting for tasks", label);

    let mut executed = 0;
    while let Some(task) = core.queue.pop() {
        unit.run_task(task);
        executed += 1;
        core.latency.pause();
    }

    info!("[{}] Terminated after {} tasks", label, executed);
    executed
}
