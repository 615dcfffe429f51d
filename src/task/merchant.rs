//! Merchants and the products they reprice

use serde::{Deserialize, Serialize};

/// A named owner of an ordered product list.
///
/// In fixed-assignment mode each merchant gets its own thread that walks `products` in order.
/// `priority` (1 = highest) is carried for reporting only; it does not influence scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merchant {
    /// Unique name within a run
    pub name: String,
    /// Products this merchant reprices, in processing order
    pub products: Vec<String>,
    /// Informational priority, 1-5
    pub priority: u8,
}

impl Merchant {
    /// Create a merchant with the default priority of 3
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        products: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            products: products.into_iter().map(Into::into).collect(),
            priority: 3,
        }
    }

    /// Builder-style priority override
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Number of products assigned to this merchant
    pub fn product_count(&self) -> usize {
        self.products.len()
    }
}
