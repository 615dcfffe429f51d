//! A single repricing job and its result fields

use crate::utils::current_time_millis;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One unit of work: reprice `product_id` on behalf of `merchant`.
///
/// A task is created with only its identity filled in; the execution unit sets the price
/// fields and the outcome. On failure `adjusted_price` equals `base_price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingTask {
    /// Unique task identifier
    pub id: Uuid,
    /// Merchant the work is attributed to
    pub merchant: String,
    /// Product being repriced
    pub product_id: String,
    /// Price before this task ran (seeded baseline for a new product)
    pub base_price: f64,
    /// Price produced by this task
    pub adjusted_price: f64,
    /// Stock level observed in the market snapshot
    pub stock_level: u32,
    /// Creation time, milliseconds since the epoch
    pub timestamp: u64,
    /// Whether the task produced a new price
    pub success: bool,
    /// Failure explanation, present only for failed tasks
    pub error: Option<String>,
}

impl PricingTask {
    /// Create a pending task
    pub fn new(id: Uuid, merchant: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self {
            id,
            merchant: merchant.into(),
            product_id: product_id.into(),
            base_price: 0.0,
            adjusted_price: 0.0,
            stock_level: 0,
            timestamp: current_time_millis(),
            success: false,
            error: None,
        }
    }

    /// Mark the task as successful with its new price
    pub fn complete(&mut self, adjusted_price: f64) {
        self.adjusted_price = adjusted_price;
        self.success = true;
        self.error = None;
    }

    /// Mark the task as failed; the adjusted price falls back to the base price
    pub fn fail(&mut self, message: impl Into<String>) {
        self.adjusted_price = self.base_price;
        self.success = false;
        self.error = Some(message.into());
    }

    /// Relative change in percent, `0.0` when there is no baseline
    pub fn adjustment_rate(&self) -> f64 {
        if self.base_price == 0.0 {
            0.0
        } else {
            (self.adjusted_price / self.base_price - 1.0) * 100.0
        }
    }
}
