use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::Serialize;

/// Where a run currently is. Reported on every progress tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Opening,
    Downloading,
    Reading,
    Flushing,
    ChunkDone,
    Completed,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Opening => "opening",
            Phase::Downloading => "downloading",
            Phase::Reading => "reading",
            Phase::Flushing => "flushing",
            Phase::ChunkDone => "chunk-done",
            Phase::Completed => "completed",
        };
        write!(f, "{}", s)
    }
}

/// Run-scoped counters.
///
/// The session worker bumps `fetched`/`parsed`/`retries`, the writer bumps
/// `imported`/`failed`/`batches`. Readers always go through `snapshot`,
/// never through the individual cells, so they see a consistent copy.
#[derive(Debug, Default)]
pub struct RunStats {
    fetched: AtomicU64,
    parsed: AtomicU64,
    imported: AtomicU64,
    failed: AtomicU64,
    batches: AtomicU64,
    retries: AtomicU64,

    last_file: Mutex<String>,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_fetched(&self, n: u64) {
        self.fetched.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_parsed(&self, n: u64) {
        self.parsed.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_imported(&self, n: u64) {
        self.imported.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_failed(&self, n: u64) {
        self.failed.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_batches(&self, n: u64) {
        self.batches.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_retries(&self, n: u64) {
        self.retries.fetch_add(n, Ordering::Relaxed);
    }

    pub fn set_last_file(&self, name: &str) {
        if let Ok(mut guard) = self.last_file.lock() {
            guard.clear();
            guard.push_str(name);
        }
    }

    /// Copy-on-read view of the counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            fetched: self.fetched.load(Ordering::Relaxed),
            parsed: self.parsed.load(Ordering::Relaxed),
            imported: self.imported.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            batches: self.batches.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            last_file: self
                .last_file
                .lock()
                .map(|g| g.clone())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub fetched: u64,
    pub parsed: u64,
    pub imported: u64,
    pub failed: u64,
    pub batches: u64,
    pub retries: u64,
    pub last_file: String,
}

/// One progress report. Emitted after each batch flush and at chunk
/// boundaries, and streamed by the live monitor.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressEvent {
    pub run_id: String,
    pub phase: Phase,
    pub fetched: u64,
    pub parsed: u64,
    pub imported: u64,
    pub failed: u64,
    pub batches: u64,
    pub retries: u64,
    pub current_file: String,
}

impl ProgressEvent {
    pub fn of(run_id: &str, phase: Phase, snapshot: &StatsSnapshot) -> Self {
        Self {
            run_id: run_id.to_string(),
            phase,
            fetched: snapshot.fetched,
            parsed: snapshot.parsed,
            imported: snapshot.imported,
            failed: snapshot.failed,
            batches: snapshot.batches,
            retries: snapshot.retries,
            current_file: snapshot.last_file.clone(),
        }
    }
}

/// Final report of one backfill run.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub run_id: String,
    pub stats: StatsSnapshot,
    /// Last chunk start that finished cleanly, YYYYMMDD.
    pub last_chunk: Option<String>,
    /// A run with non-zero `failed` completed, but not cleanly. The
    /// operator must be able to tell the two apart.
    pub completed_with_errors: bool,
    /// Stopped early by a cancellation signal.
    pub cancelled: bool,
    pub duration_secs: u64,
}

impl RunResult {
    pub fn is_clean(&self) -> bool {
        !self.completed_with_errors
    }
}
