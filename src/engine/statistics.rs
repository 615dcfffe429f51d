//! Task counters and the end-of-run report

use crate::table::PriceTable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-lifetime task counters.
///
/// Lock-free; `total` is bumped before the outcome counter, so `successful + failed ==
/// total` holds whenever no task is in flight.
#[derive(Debug, Default)]
pub struct EngineStatistics {
    /// Tasks finished, whatever their outcome
    pub total: AtomicU64,
    /// Tasks that produced a new price
    pub successful: AtomicU64,
    /// Tasks that failed
    pub failed: AtomicU64,
}

impl EngineStatistics {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one task
    pub fn record(&self, success: bool) {
        self.total.fetch_add(1, Ordering::AcqRel);
        if success {
            self.successful.fetch_add(1, Ordering::AcqRel);
        } else {
            self.failed.fetch_add(1, Ordering::AcqRel);
        }
    }

    /// Tasks finished so far
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Acquire)
    }

    /// Successful tasks so far
    pub fn successful(&self) -> u64 {
        self.successful.load(Ordering::Acquire)
    }

    /// Failed tasks so far
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Acquire)
    }

    /// Combine the counters with the current state of the price table
    ///
    /// Outcome counters are read before the total, so a report taken while units run never
    /// shows more outcomes than tasks.
    pub fn report(&self, table: &PriceTable) -> StatisticsReport {
        let successful = self.successful();
        let failed = self.failed();
        let total_tasks = self.total();
        let range = table.price_range();
        StatisticsReport {
            total_tasks,
            successful,
            failed,
            unique_products: table.size(),
            min_price: range.map(|(min, _)| min),
            max_price: range.map(|(_, max)| max),
        }
    }
}

/// A plain copy of the counters plus the price range of the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsReport {
    /// Tasks finished
    pub total_tasks: u64,
    /// Tasks that produced a new price
    pub successful: u64,
    /// Tasks that failed
    pub failed: u64,
    /// Products present in the price table
    pub unique_products: usize,
    /// Lowest current price
    pub min_price: Option<f64>,
    /// Highest current price
    pub max_price: Option<f64>,
}

impl StatisticsReport {
    /// Share of successful tasks in percent
    pub fn success_rate(&self) -> f64 {
        if self.total_tasks == 0 {
            0.0
        } else {
            self.successful as f64 * 100.0 / self.total_tasks as f64
        }
    }

    /// Share of failed tasks in percent
    pub fn failure_rate(&self) -> f64 {
        if self.total_tasks == 0 {
            0.0
        } else {
            self.failed as f64 * 100.0 / self.total_tasks as f64
        }
    }

    /// True when every finished task is accounted for as either success or failure
    pub fn is_consistent(&self) -> bool {
        self.successful + self.failed == self.total_tasks
    }
}

impl fmt::Display for StatisticsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total tasks:     {}", self.total_tasks)?;
        writeln!(
            f,
            "Successful:      {} ({:.2}%)",
            self.successful,
            self.success_rate()
        )?;
        writeln!(
            f,
            "Failed:          {} ({:.2}%)",
            self.failed,
            self.failure_rate()
        )?;
        write!(f, "Unique products: {}", self.unique_products)?;
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            write!(f, "\nPrice range:     {min:.2} - {max:.2}")?;
        }
        Ok(())
    }
}
