mod history;
mod record;

pub use history::HistoryLedger;
pub use record::{CSV_COLUMNS, PriceRecord, PriceStatus};
