//! Checksummed snapshot package for the price table

use crate::errors::PricingError;
use crate::utils::current_time_millis;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// A point-in-time copy of the price table.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTableSnapshot {
    /// Milliseconds since the epoch at which the copy was taken.
    pub captured_at: u64,
    /// Product identifier → price, ordered by identifier.
    pub prices: BTreeMap<String, f64>,
}

impl PriceTableSnapshot {
    /// Wrap a copied price map, stamping it with the current time
    pub fn new(prices: BTreeMap<String, f64>) -> Self {
        Self {
            captured_at: current_time_millis(),
            prices,
        }
    }

    /// Number of products in the snapshot
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// True when the snapshot holds no prices
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Price of a product at capture time, `None` when it was unseeded
    pub fn get(&self, product_id: &str) -> Option<f64> {
        self.prices.get(product_id).copied()
    }
}

/// Format version for checksum-enabled price table snapshots.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Serialized representation of a price table snapshot including checksum validation metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTableSnapshotPackage {
    /// Version of the serialized snapshot schema to support future migrations.
    pub version: u32,
    /// Captured snapshot data.
    pub snapshot: PriceTableSnapshot,
    /// Hex-encoded checksum used to validate the snapshot integrity.
    pub checksum: String,
}

impl PriceTableSnapshotPackage {
    /// Creates a new snapshot package computing the checksum for the provided snapshot.
    pub fn new(snapshot: PriceTableSnapshot) -> Result<Self, PricingError> {
        let checksum = Self::compute_checksum(&snapshot)?;

        Ok(Self {
            version: SNAPSHOT_FORMAT_VERSION,
            snapshot,
            checksum,
        })
    }

    /// Serializes the package to JSON.
    pub fn to_json(&self) -> Result<String, PricingError> {
        serde_json::to_string(self).map_err(|error| PricingError::SerializationError {
            message: error.to_string(),
        })
    }

    /// Deserializes a package from JSON.
    pub fn from_json(data: &str) -> Result<Self, PricingError> {
        serde_json::from_str(data).map_err(|error| PricingError::DeserializationError {
            message: error.to_string(),
        })
    }

    /// Validates the version and the checksum against the contained snapshot.
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.version != SNAPSHOT_FORMAT_VERSION {
            return Err(PricingError::InvalidOperation {
                message: format!(
                    "Unsupported snapshot version: {} (expected {})",
                    self.version, SNAPSHOT_FORMAT_VERSION
                ),
            });
        }

        let computed = Self::compute_checksum(&self.snapshot)?;
        if computed != self.checksum {
            return Err(PricingError::ChecksumMismatch {
                expected: self.checksum.clone(),
                actual: computed,
            });
        }

        Ok(())
    }

    /// Consumes the package after validating the checksum and returns the contained snapshot.
    pub fn into_snapshot(self) -> Result<PriceTableSnapshot, PricingError> {
        self.validate()?;
        Ok(self.snapshot)
    }

    fn compute_checksum(snapshot: &PriceTableSnapshot) -> Result<String, PricingError> {
        let payload =
            serde_json::to_vec(snapshot).map_err(|error| PricingError::SerializationError {
                message: error.to_string(),
            })?;

        let mut hasher = Sha256::new();
        hasher.update(payload);

        Ok(format!("{:x}", hasher.finalize()))
    }
}
