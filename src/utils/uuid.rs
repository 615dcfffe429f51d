//! Deterministic task id generation

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Generates deterministic, unique task identifiers.
///
/// Each call to [`UuidGenerator::next`] hashes the namespace with a monotonically increasing
/// counter (UUID v5), so two generators with the same namespace produce the same sequence.
/// Safe to share between threads.
#[derive(Debug)]
pub struct UuidGenerator {
    namespace: Uuid,
    counter: AtomicU64,
}

impl UuidGenerator {
    /// Create a generator for the given namespace
    pub fn new(namespace: Uuid) -> Self {
        Self {
            namespace,
            counter: AtomicU64::new(0),
        }
    }

    /// Next identifier in the sequence
    pub fn next(&self) -> Uuid {
        let counter = self.counter.fetch_add(1, Ordering::Relaxed);
        Uuid::new_v5(&self.namespace, &counter.to_be_bytes())
    }
}

impl Default for UuidGenerator {
    fn default() -> Self {
        Self::new(Uuid::new_v4())
    }
}
