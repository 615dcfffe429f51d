mod config;
mod executor;
mod orchestrator;
mod statistics;
mod worker;

pub use config::{EngineConfig, Latency};
pub use orchestrator::{Orchestrator, OrchestratorBuilder};
pub use statistics::{EngineStatistics, StatisticsReport};
