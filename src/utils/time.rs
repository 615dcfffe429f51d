//! Wall-clock helpers

use chrono::{Local, Timelike};
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
pub fn current_time_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Local wall-clock time formatted as `%Y-%m-%d %H:%M:%S`, the format used in audit records.
pub fn current_time_string() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Local hour of day, 0-23.
pub fn current_hour() -> u32 {
    Local::now().hour()
}
