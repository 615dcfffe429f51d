mod logger;
mod time;
mod uuid;

pub use logger::setup_logger;
pub use time::{current_hour, current_time_millis, current_time_string};
pub use uuid::UuidGenerator;
