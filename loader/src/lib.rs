pub mod backfill;
pub mod monitor;
pub mod pipeline;
pub mod resume;

pub use backfill::{run_backfill, run_chunk, BackfillRequest};
pub use monitor::{monitor, MonitorHandle, MonitorRequest, TriggerKind};
