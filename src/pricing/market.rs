//! Market observations fed to the pricing function

use crate::errors::PricingError;
use crate::pricing::model::{MarketSnapshot, Product};
use crate::utils::current_hour;
use rand::Rng;

/// Source of the product view and market signals for one pricing decision.
///
/// Called by the execution unit after the base price is known. Implementations must not
/// touch engine state; an `Err` fails the task like a pricing error would.
pub trait MarketProvider: Send + Sync {
    /// Assemble the product and market snapshot for `product_id` at `base_price`
    fn observe(
        &self,
        product_id: &str,
        base_price: f64,
    ) -> Result<(Product, MarketSnapshot), PricingError>;
}

/// Randomized market generator used when no live data source is wired in.
///
/// Stock 50-500 units, 100-2000 views, 20-400 carts, 5-80 purchases, demand 50-250 units,
/// competitor price within ±15% of the base, 30% peak season, 20% chance that a newer model
/// is on sale. The hour of day is the local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedMarket;

impl SimulatedMarket {
    /// Create the generator
    pub fn new() -> Self {
        Self
    }
}

impl MarketProvider for SimulatedMarket {
    fn observe(
        &self,
        product_id: &str,
        base_price: f64,
    ) -> Result<(Product, MarketSnapshot), PricingError> {
        let mut rng = rand::thread_rng();

        let product = Product::new(product_id, base_price, rng.gen_range(50..=500));
        let market = MarketSnapshot {
            competitor_price: base_price * rng.gen_range(0.85..=1.15),
            demand_forecast: rng.gen_range(50.0..=250.0),
            is_peak_season: rng.gen_bool(0.3),
            view_count: rng.gen_range(100..=2000),
            cart_count: rng.gen_range(20..=400),
            purchase_count: rng.gen_range(5..=80),
            hour_of_day: current_hour(),
            newer_model_available: rng.gen_bool(0.2),
        };

        Ok((product, market))
    }
}
