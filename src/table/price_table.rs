//! Shared product → price table

use crate::errors::PricingError;
use crate::table::snapshot::{PriceTableSnapshot, PriceTableSnapshotPackage};
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// A concurrent map from product identifier to current price.
///
/// Many readers may hold the table at once; writers are serialized through the exclusive
/// side of a reader-writer lock. An absent product reads as `0.0`, which callers treat as
/// "no baseline yet".
#[derive(Debug, Default)]
pub struct PriceTable {
    prices: RwLock<BTreeMap<String, f64>>,
}

impl PriceTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            prices: RwLock::new(BTreeMap::new()),
        }
    }

    /// Rebuilds a table from a previously captured snapshot.
    pub fn from_snapshot(snapshot: PriceTableSnapshot) -> Self {
        Self {
            prices: RwLock::new(snapshot.prices),
        }
    }

    /// Restores a table from checksum-protected snapshot JSON.
    pub fn from_snapshot_json(data: &str) -> Result<Self, PricingError> {
        let package = PriceTableSnapshotPackage::from_json(data)?;
        Ok(Self::from_snapshot(package.into_snapshot()?))
    }

    /// Current price of a product, or `0.0` when it has never been set
    pub fn get(&self, product_id: &str) -> f64 {
        self.prices.read().get(product_id).copied().unwrap_or(0.0)
    }

    /// Unconditionally overwrite the price of a product
    pub fn set(&self, product_id: &str, price: f64) {
        self.prices.write().insert(product_id.to_string(), price);
    }

    /// Stores `price` if the product is absent or `price` is strictly lower than the stored one.
    ///
    /// The comparison and the write happen under a single exclusive acquisition, so concurrent
    /// callers can never both observe the old value and overwrite each other.
    ///
    /// Returns `true` when the value was stored.
    pub fn update_if_lower(&self, product_id: &str, price: f64) -> bool {
        let mut prices = self.prices.write();
        match prices.get_mut(product_id) {
            Some(current) if price < *current => {
                *current = price;
                true
            }
            Some(_) => false,
            None => {
                prices.insert(product_id.to_string(), price);
                true
            }
        }
    }

    /// Copy of every entry, taken under one shared acquisition
    pub fn snapshot(&self) -> BTreeMap<String, f64> {
        self.prices.read().clone()
    }

    /// Point-in-time snapshot with its capture timestamp
    pub fn capture(&self) -> PriceTableSnapshot {
        PriceTableSnapshot::new(self.snapshot())
    }

    /// Checksum-protected package of the current table, ready to be serialized.
    pub fn snapshot_package(&self) -> Result<PriceTableSnapshotPackage, PricingError> {
        PriceTableSnapshotPackage::new(self.capture())
    }

    /// Number of products with a price
    pub fn size(&self) -> usize {
        self.prices.read().len()
    }

    /// True when no product has been priced yet
    pub fn is_empty(&self) -> bool {
        self.prices.read().is_empty()
    }

    /// Lowest and highest price, computed from a single consistent view
    pub fn price_range(&self) -> Option<(f64, f64)> {
        let prices = self.prices.read();
        prices.values().fold(None, |range, &price| match range {
            None => Some((price, price)),
            Some((min, max)) => Some((min.min(price), max.max(price))),
        })
    }
}
