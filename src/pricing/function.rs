//! Pricing function seam and its outcome type

use crate::errors::PricingError;
use crate::pricing::model::{MarketSnapshot, PricingOutcome, Product};

/// A pure pricing decision: product + market snapshot in, new price out.
///
/// Implementations must not touch engine state; the execution unit calls them without
/// holding any lock. An `Err` marks the task as failed and leaves the price table untouched.
///
/// Any `Fn(&Product, &MarketSnapshot) -> Result<PricingOutcome, PricingError>` closure that
/// is `Send + Sync` implements this trait.
pub trait PricingFunction: Send + Sync {
    /// Compute a new price for `product`
    fn price(
        &self,
        product: &Product,
        market: &MarketSnapshot,
    ) -> Result<PricingOutcome, PricingError>;
}

impl<F> PricingFunction for F
where
    F: Fn(&Product, &MarketSnapshot) -> Result<PricingOutcome, PricingError> + Send + Sync,
{
    fn price(
        &self,
        product: &Product,
        market: &MarketSnapshot,
    ) -> Result<PricingOutcome, PricingError> {
        self(product, market)
    }
}
