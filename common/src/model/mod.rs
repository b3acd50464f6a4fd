pub mod run_stats;

pub use run_stats::{Phase, ProgressEvent, RunResult, RunStats, StatsSnapshot};
