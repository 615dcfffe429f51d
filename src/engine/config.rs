//! Engine settings loaded from defaults, JSON files and the environment

use crate::errors::PricingError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::thread;
use std::time::Duration;

/// Engine settings.
///
/// Every field has a default, so a JSON document only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Destination of the asynchronous log
    pub log_path: PathBuf,
    /// Lower bound of the baseline price for unseeded products
    pub seed_min: f64,
    /// Upper bound of the baseline price for unseeded products
    pub seed_max: f64,
    /// Minimum simulated latency between two tasks of the same unit, in milliseconds
    pub min_delay_ms: u64,
    /// Maximum simulated latency between two tasks of the same unit, in milliseconds
    pub max_delay_ms: u64,
    /// Default size of the worker pool
    pub worker_count: usize,
    /// Retention window of the history ledger, unbounded when absent
    pub ledger_capacity: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("output/pricing.log"),
            seed_min: 5000.0,
            seed_max: 15000.0,
            min_delay_ms: 50,
            max_delay_ms: 200,
            worker_count: 4,
            ledger_capacity: None,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON document and validate it
    pub fn from_json_str(data: &str) -> Result<Self, PricingError> {
        let config: EngineConfig =
            serde_json::from_str(data).map_err(|error| PricingError::DeserializationError {
                message: error.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PricingError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .map_err(|e| PricingError::io(path.display().to_string(), e))?;
        Self::from_json_str(&data)
    }

    /// Applies `PRICING_LOG_PATH`, `PRICING_WORKERS`, `PRICING_MIN_DELAY_MS` and
    /// `PRICING_MAX_DELAY_MS` when they are set.
    pub fn apply_env_overrides(mut self) -> Result<Self, PricingError> {
        if let Ok(path) = env::var("PRICING_LOG_PATH") {
            self.log_path = PathBuf::from(path);
        }
        if let Some(workers) = env_value::<usize>("PRICING_WORKERS")? {
            self.worker_count = workers;
        }
        if let Some(min) = env_value::<u64>("PRICING_MIN_DELAY_MS")? {
            self.min_delay_ms = min;
        }
        if let Some(max) = env_value::<u64>("PRICING_MAX_DELAY_MS")? {
            self.max_delay_ms = max;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check that the ranges are ordered and the sizes non-zero
    pub fn validate(&self) -> Result<(), PricingError> {
        if !self.seed_min.is_finite()
            || !self.seed_max.is_finite()
            || self.seed_min <= 0.0
            || self.seed_min > self.seed_max
        {
            return Err(PricingError::InvalidConfig {
                message: format!(
                    "seed range must satisfy 0 < seed_min <= seed_max, got {}..{}",
                    self.seed_min, self.seed_max
                ),
            });
        }
        if self.min_delay_ms > self.max_delay_ms {
            return Err(PricingError::InvalidConfig {
                message: format!(
                    "min_delay_ms ({}) exceeds max_delay_ms ({})",
                    self.min_delay_ms, self.max_delay_ms
                ),
            });
        }
        if self.worker_count == 0 {
            return Err(PricingError::InvalidConfig {
                message: "worker_count must be at least 1".to_string(),
            });
        }
        if self.ledger_capacity == Some(0) {
            return Err(PricingError::InvalidConfig {
                message: "ledger_capacity must be at least 1 when set".to_string(),
            });
        }
        Ok(())
    }

    /// Builder-style log destination
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = path.into();
        self
    }

    /// Builder-style simulated latency range; `(0, 0)` disables the pause
    pub fn with_latency(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.min_delay_ms = min_ms;
        self.max_delay_ms = max_ms;
        self
    }

    /// Builder-style seeding range
    pub fn with_seed_range(mut self, min: f64, max: f64) -> Self {
        self.seed_min = min;
        self.seed_max = max;
        self
    }

    /// Builder-style ledger retention window
    pub fn with_ledger_capacity(mut self, capacity: usize) -> Self {
        self.ledger_capacity = Some(capacity);
        self
    }

    /// The latency settings as a [`Latency`]
    pub fn latency(&self) -> Latency {
        Latency {
            min_ms: self.min_delay_ms,
            max_ms: self.max_delay_ms,
        }
    }
}

fn env_value<T: FromStr>(name: &str) -> Result<Option<T>, PricingError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| PricingError::InvalidFieldValue {
                field: name.to_string(),
                value: raw,
            }),
        Err(_) => Ok(None),
    }
}

/// Simulated per-task latency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Latency {
    /// Lower bound in milliseconds
    pub min_ms: u64,
    /// Upper bound in milliseconds
    pub max_ms: u64,
}

impl Latency {
    /// Sleep the calling thread for a random duration in range; no-op when the range is zero
    pub fn pause(&self) {
        if self.max_ms == 0 {
            return;
        }
        let millis = rand::thread_rng().gen_range(self.min_ms..=self.max_ms);
        thread::sleep(Duration::from_millis(millis));
    }
}
