//! Append-only audit trail of price changes

use crate::errors::PricingError;
use crate::ledger::record::{CSV_COLUMNS, PriceRecord};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

#[derive(Debug, Default)]
struct LedgerState {
    records: VecDeque<PriceRecord>,
    appended: u64,
}

/// An append-only list of [`PriceRecord`]s guarded by its own mutex.
///
/// Unbounded by default. With a retention capacity the oldest rows are evicted once the
/// window is full; the retained rows keep their append order and
/// [`HistoryLedger::total_appended`] still counts every append.
#[derive(Debug, Default)]
pub struct HistoryLedger {
    state: Mutex<LedgerState>,
    capacity: Option<usize>,
}

impl HistoryLedger {
    /// Create an unbounded ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger that retains at most `capacity` rows (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(LedgerState::default()),
            capacity: Some(capacity.max(1)),
        }
    }

    /// Retention capacity, `None` when unbounded
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Append a record; amortized O(1)
    pub fn append(&self, record: PriceRecord) {
        let mut state = self.state.lock();
        state.records.push_back(record);
        state.appended += 1;
        if let Some(capacity) = self.capacity {
            while state.records.len() > capacity {
                state.records.pop_front();
            }
        }
    }

    /// Number of retained records
    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    /// True when nothing is retained
    pub fn is_empty(&self) -> bool {
        self.state.lock().records.is_empty()
    }

    /// Number of records ever appended, including evicted ones
    pub fn total_appended(&self) -> u64 {
        self.state.lock().appended
    }

    /// Copy of the retained records in append order, taken under one lock acquisition
    pub fn records(&self) -> Vec<PriceRecord> {
        self.state.lock().records.iter().cloned().collect()
    }

    /// Retained records for a single product, in append order
    pub fn records_for(&self, product_id: &str) -> Vec<PriceRecord> {
        self.state
            .lock()
            .records
            .iter()
            .filter(|record| record.product_id == product_id)
            .cloned()
            .collect()
    }

    /// Writes the CSV header and every retained record to `writer`.
    ///
    /// The records are copied under a single lock acquisition and written afterwards, so a
    /// slow destination never holds up appenders. Fields containing separators, quotes or
    /// line breaks are quoted. Returns the number of rows written.
    pub fn export_to<W: Write>(&self, writer: W) -> Result<usize, PricingError> {
        let records = self.records();
        let mut wtr = csv::Writer::from_writer(writer);

        let write_all = |wtr: &mut csv::Writer<W>| -> csv::Result<()> {
            wtr.write_record(CSV_COLUMNS)?;
            for record in &records {
                wtr.write_record(record.csv_fields())?;
            }
            wtr.flush()?;
            Ok(())
        };

        write_all(&mut wtr).map_err(|e| PricingError::io("ledger export", e.into()))?;
        Ok(records.len())
    }

    /// Exports the ledger as CSV to `path`, creating parent directories when needed.
    pub fn export_csv(&self, path: impl AsRef<Path>) -> Result<usize, PricingError> {
        let path = path.as_ref();
        let label = path.display().to_string();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| PricingError::io(&label, e))?;
            }
        }

        let file = File::create(path).map_err(|e| PricingError::io(&label, e))?;
        let rows = self.export_to(BufWriter::new(file)).map_err(|error| match error {
            PricingError::Io { source, .. } => PricingError::io(&label, source),
            other => other,
        })?;

        info!("Price trend exported to: {} ({} rows)", label, rows);
        Ok(rows)
    }
}
