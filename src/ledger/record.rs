//! Audit rows and their CSV column layout

use crate::task::PricingTask;
use crate::utils::current_time_string;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Column order of the price-trend export.
pub const CSV_COLUMNS: [&str; 8] = [
    "timestamp",
    "merchant",
    "product",
    "original_price",
    "adjusted_price",
    "adjustment_rate",
    "stock_level",
    "status",
];

/// Outcome of a pricing task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceStatus {
    /// A new price was computed and stored
    Success,
    /// The task failed; the price table was left untouched
    Failed,
}

impl fmt::Display for PriceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceStatus::Success => write!(f, "SUCCESS"),
            PriceStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// Immutable audit row describing one completed task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Task that produced this record
    pub task_id: Uuid,
    /// Local time the record was written, `%Y-%m-%d %H:%M:%S`
    pub timestamp: String,
    /// Merchant the task was attributed to
    pub merchant: String,
    /// Product that was repriced
    pub product_id: String,
    /// Price before the task
    pub original_price: f64,
    /// Price after the task (equal to `original_price` on failure)
    pub adjusted_price: f64,
    /// Relative change in percent
    pub adjustment_rate: f64,
    /// Stock observed by the task
    pub stock_level: u32,
    /// SUCCESS or FAILED
    pub status: PriceStatus,
}

impl PriceRecord {
    /// Fold a finished task into an audit row stamped with the current local time
    pub fn from_task(task: &PricingTask) -> Self {
        Self {
            task_id: task.id,
            timestamp: current_time_string(),
            merchant: task.merchant.clone(),
            product_id: task.product_id.clone(),
            original_price: task.base_price,
            adjusted_price: task.adjusted_price,
            adjustment_rate: task.adjustment_rate(),
            stock_level: task.stock_level,
            status: if task.success {
                PriceStatus::Success
            } else {
                PriceStatus::Failed
            },
        }
    }

    /// True for SUCCESS rows
    pub fn is_success(&self) -> bool {
        self.status == PriceStatus::Success
    }

    /// The export fields in [`CSV_COLUMNS`] order: prices with two decimals, the rate
    /// suffixed with `%`. Quoting is left to the CSV writer.
    pub fn csv_fields(&self) -> [String; 8] {
        [
            self.timestamp.clone(),
            self.merchant.clone(),
            self.product_id.clone(),
            format!("{:.2}", self.original_price),
            format!("{:.2}", self.adjusted_price),
            format!("{:.2}%", self.adjustment_rate),
            self.stock_level.to_string(),
            self.status.to_string(),
        ]
    }
}
