//! Default multi-factor pricing heuristic

use crate::errors::PricingError;
use crate::pricing::function::PricingFunction;
use crate::pricing::model::{MarketSnapshot, PricingOutcome, Product};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

const MIN_PRICE_MULTIPLIER: f64 = 0.5;
const MAX_PRICE_MULTIPLIER: f64 = 2.0;

const STOCK_WEIGHT: f64 = 0.35;
const COMPETITOR_WEIGHT: f64 = 0.25;
const DEMAND_WEIGHT: f64 = 0.25;
const TIME_WEIGHT: f64 = 0.15;

fn safe_divider(value: f64) -> f64 {
    if value == 0.0 { 1.0 } else { value }
}

/// Individual factor contributions behind a heuristic price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Inventory pressure and product lifecycle, in `[-0.25, 0.2]`
    pub stock_factor: f64,
    /// Competitor reaction, in `[-0.3, 0.2]`
    pub competitor_factor: f64,
    /// Forecast demand and on-site behavior, in `[-0.25, 0.25]`
    pub demand_factor: f64,
    /// Season and time of day, in `[-0.15, 0.2]`
    pub time_factor: f64,
    /// Weighted sum of the factors
    pub adjustment: f64,
    /// Final price after clamping to `[0.5, 2.0] × base`
    pub new_price: f64,
    /// Explanation naming the strategies that fired
    pub explanation: String,
}

/// Weighted heuristic over stock, competitor, demand and time signals.
///
/// The final price is `base × (1 + adjustment)` clamped to half and double the base price.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicPricing;

impl HeuristicPricing {
    /// Create the heuristic
    pub fn new() -> Self {
        Self
    }

    /// Compute the full breakdown for a product
    pub fn evaluate(
        &self,
        product: &Product,
        market: &MarketSnapshot,
    ) -> Result<PriceBreakdown, PricingError> {
        if !product.base_price.is_finite() || product.base_price <= 0.0 {
            return Err(PricingError::PricingFailed {
                product: product.id.clone(),
                message: format!("base price must be positive, got {}", product.base_price),
            });
        }

        let stock_factor = self.stock_factor(product, market);
        let competitor_factor = self.competitor_factor(product, market);
        let demand_factor = self.demand_factor(market);
        let time_factor = self.time_factor(product, market);

        let adjustment = STOCK_WEIGHT * stock_factor
            + COMPETITOR_WEIGHT * competitor_factor
            + DEMAND_WEIGHT * demand_factor
            + TIME_WEIGHT * time_factor;

        let new_price = (product.base_price * (1.0 + adjustment)).clamp(
            product.base_price * MIN_PRICE_MULTIPLIER,
            product.base_price * MAX_PRICE_MULTIPLIER,
        );

        let mut explanation = format!(
            "Stock factor={stock_factor:.4}, competitor factor={competitor_factor:.4}, demand factor={demand_factor:.4}, time factor={time_factor:.4}. "
        );

        if !product.is_new_model && market.newer_model_available {
            explanation.push_str("Newer model detected in series; discount applied. ");
        }
        if market.competitor_price > 0.0 {
            let gap = (market.competitor_price - product.base_price)
                / safe_divider(product.base_price);
            if gap < -0.05 {
                let _ = write!(
                    explanation,
                    "Competitor undercut detected ({:.2}%); responding with price decrease. ",
                    gap * 100.0
                );
            } else if gap > 0.05 {
                explanation.push_str("Competitor priced higher; slight premium maintained. ");
            }
        }
        if market.is_peak_season {
            explanation.push_str("Peak season active; seasonal strategy influencing price. ");
        }
        let conversion_rate =
            market.purchase_count as f64 / safe_divider(market.view_count as f64);
        if market.view_count > 50 && conversion_rate < 0.05 {
            explanation.push_str("High interest but low conversion; engagement discount applied. ");
        }
        let _ = write!(
            explanation,
            "Final adjustment={:.2}%, price clamped to {:.2}.",
            adjustment * 100.0,
            new_price
        );

        Ok(PriceBreakdown {
            stock_factor,
            competitor_factor,
            demand_factor,
            time_factor,
            adjustment,
            new_price,
            explanation,
        })
    }

    fn stock_factor(&self, product: &Product, market: &MarketSnapshot) -> f64 {
        let demand = market.demand_forecast.max(1.0);
        let inventory_ratio = product.stock as f64 / demand;

        let mut factor = if inventory_ratio > 2.5 {
            -0.18
        } else if inventory_ratio > 1.5 {
            -0.08
        } else if inventory_ratio < 0.3 {
            0.12
        } else if inventory_ratio < 0.7 {
            0.05
        } else {
            0.0
        };

        factor += self.new_product_strategy(product, market);
        factor.clamp(-0.25, 0.2)
    }

    fn competitor_factor(&self, product: &Product, market: &MarketSnapshot) -> f64 {
        let mut factor = 0.0;
        if market.competitor_price > 0.0 {
            let gap = (market.competitor_price - product.base_price)
                / safe_divider(product.base_price);
            if gap < -0.05 {
                factor = -0.04;
            } else if gap > 0.1 {
                factor = 0.05;
            }
        }
        factor += self.competitor_strategy(product, market);
        factor.clamp(-0.3, 0.2)
    }

    fn demand_factor(&self, market: &MarketSnapshot) -> f64 {
        let factor =
            (market.demand_forecast / 200.0).clamp(-0.2, 0.2) + self.user_behavior_strategy(market);
        factor.clamp(-0.25, 0.25)
    }

    fn time_factor(&self, product: &Product, market: &MarketSnapshot) -> f64 {
        let mut factor = self.seasonal_strategy(product, market);
        let hour = market.hour_of_day;
        if hour >= 20 || hour < 6 {
            factor -= 0.01;
        } else if (10..=16).contains(&hour) {
            factor += 0.01;
        }
        factor.clamp(-0.15, 0.2)
    }

    // legacy models lose value once a newer sibling ships
    fn new_product_strategy(&self, product: &Product, market: &MarketSnapshot) -> f64 {
        if product.is_new_model || !market.newer_model_available {
            return 0.0;
        }
        let stock_pressure = (product.stock as f64 / 500.0).clamp(0.0, 1.0);
        -0.05 - 0.1 * stock_pressure
    }

    fn competitor_strategy(&self, product: &Product, market: &MarketSnapshot) -> f64 {
        if market.competitor_price <= 0.0 {
            return 0.0;
        }

        let ratio =
            (market.competitor_price - product.base_price) / safe_divider(product.base_price);
        if ratio < -0.05 {
            // 5%-35% undercut window
            let severity = ((-0.05 - ratio) / 0.3).clamp(0.0, 1.0);
            let mut adjustment = -0.06 - 0.12 * severity;
            if product.is_new_model || market.demand_forecast > 150.0 {
                adjustment *= 0.6;
            }
            return adjustment;
        }
        if ratio > 0.05 {
            return (ratio * 0.5).min(0.05);
        }
        0.0
    }

    fn seasonal_strategy(&self, product: &Product, market: &MarketSnapshot) -> f64 {
        if !market.is_peak_season {
            return 0.0;
        }

        let demand = market.demand_forecast.max(1.0);
        let stock_ratio = product.stock as f64 / demand;

        let mut adjustment = 0.04;
        if stock_ratio < 0.3 {
            adjustment += 0.04;
        } else if stock_ratio < 0.7 {
            adjustment += 0.02;
        } else {
            adjustment -= 0.02;
        }
        adjustment
    }

    fn user_behavior_strategy(&self, market: &MarketSnapshot) -> f64 {
        if market.view_count < 50 {
            return 0.0;
        }

        let views = market.view_count as f64;
        let conversion_rate = market.purchase_count as f64 / views;
        let cart_rate = market.cart_count as f64 / views;

        if conversion_rate < 0.03 && cart_rate > 0.1 {
            -0.08
        } else if conversion_rate < 0.05 {
            -0.05
        } else if cart_rate > 0.2 && conversion_rate < 0.1 {
            -0.03
        } else {
            0.0
        }
    }
}

impl PricingFunction for HeuristicPricing {
    fn price(
        &self,
        product: &Product,
        market: &MarketSnapshot,
    ) -> Result<PricingOutcome, PricingError> {
        let breakdown = self.evaluate(product, market)?;
        Ok(PricingOutcome::new(
            breakdown.new_price,
            product.base_price,
            breakdown.explanation,
        ))
    }
}
