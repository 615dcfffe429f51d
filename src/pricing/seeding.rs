//! Base price seeding for products seen for the first time

use crate::errors::PricingError;
use rand::Rng;

/// Chooses the baseline price of a product that has never been priced.
///
/// Seeding is not an adjustment: the seeded value becomes the task's base price and only
/// reaches the price table if the task succeeds.
pub trait SeedingPolicy: Send + Sync {
    /// Baseline for `product_id`
    fn seed(&self, product_id: &str) -> f64;
}

/// Uniformly sampled baseline within `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformSeeding {
    min: f64,
    max: f64,
}

impl UniformSeeding {
    /// Create a policy; the range must be finite, positive and ordered
    pub fn new(min: f64, max: f64) -> Result<Self, PricingError> {
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
            return Err(PricingError::InvalidConfig {
                message: format!("seed range must satisfy 0 < min <= max, got {min}..{max}"),
            });
        }
        Ok(Self { min, max })
    }

    /// Lower bound of the range
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound of the range
    pub fn max(&self) -> f64 {
        self.max
    }
}

impl Default for UniformSeeding {
    fn default() -> Self {
        Self {
            min: 5000.0,
            max: 15000.0,
        }
    }
}

impl SeedingPolicy for UniformSeeding {
    fn seed(&self, _product_id: &str) -> f64 {
        rand::thread_rng().gen_range(self.min..=self.max)
    }
}

/// The same baseline for every product
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedSeeding(pub f64);

impl SeedingPolicy for FixedSeeding {
    fn seed(&self, _product_id: &str) -> f64 {
        self.0
    }
}
