//! Products and their categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse product family, derived from the product identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    /// Identifiers containing `iPhone`
    Smartphone,
    /// Identifiers containing `MacBook`
    Laptop,
    /// Identifiers containing `RTX`
    Gpu,
    /// Everything else
    Other,
}

impl ProductCategory {
    /// Classify a product identifier
    pub fn from_product_id(product_id: &str) -> Self {
        if product_id.contains("iPhone") {
            ProductCategory::Smartphone
        } else if product_id.contains("MacBook") {
            ProductCategory::Laptop
        } else if product_id.contains("RTX") {
            ProductCategory::Gpu
        } else {
            ProductCategory::Other
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductCategory::Smartphone => write!(f, "smartphone"),
            ProductCategory::Laptop => write!(f, "laptop"),
            ProductCategory::Gpu => write!(f, "gpu"),
            ProductCategory::Other => write!(f, "other"),
        }
    }
}

/// The product as seen by the pricing function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Product family
    pub category: ProductCategory,
    /// Price the adjustment is computed against
    pub base_price: f64,
    /// Units in stock
    pub stock: u32,
    /// Whether this is the newest model of its series
    pub is_new_model: bool,
    /// Series the product belongs to
    pub series: String,
}

impl Product {
    /// Build a product from its identifier, deriving category, series and new-model flag
    pub fn new(id: impl Into<String>, base_price: f64, stock: u32) -> Self {
        let id = id.into();
        let category = ProductCategory::from_product_id(&id);
        Self {
            name: id.clone(),
            is_new_model: id.contains("New"),
            series: category.to_string(),
            category,
            base_price,
            stock,
            id,
        }
    }
}

/// Market signals gathered for one pricing decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Competitor's price for the same product, `0.0` when unknown
    pub competitor_price: f64,
    /// Forecast demand in units
    pub demand_forecast: f64,
    /// Peak-season flag
    pub is_peak_season: bool,
    /// Product page views
    pub view_count: u32,
    /// Add-to-cart events
    pub cart_count: u32,
    /// Completed purchases
    pub purchase_count: u32,
    /// Local hour of day, 0-23
    pub hour_of_day: u32,
    /// A newer model of the same series is on sale
    pub newer_model_available: bool,
}

impl Default for MarketSnapshot {
    fn default() -> Self {
        Self {
            competitor_price: 0.0,
            demand_forecast: 0.0,
            is_peak_season: false,
            view_count: 0,
            cart_count: 0,
            purchase_count: 0,
            hour_of_day: 12,
            newer_model_available: false,
        }
    }
}

/// Result of a pricing decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingOutcome {
    /// The new price
    pub new_price: f64,
    /// Change relative to the base price, in percent
    pub adjustment_percent: f64,
    /// Human-readable explanation of the decision
    pub explanation: String,
}

impl PricingOutcome {
    /// Build an outcome, deriving the percentage from `base_price`
    pub fn new(new_price: f64, base_price: f64, explanation: impl Into<String>) -> Self {
        let adjustment_percent = if base_price == 0.0 {
            0.0
        } else {
            (new_price / base_price - 1.0) * 100.0
        };
        Self {
            new_price,
            adjustment_percent,
            explanation: explanation.into(),
        }
    }
}
