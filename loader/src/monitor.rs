use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::Local;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{info, warn};
use uuid::Uuid;

use common::config::LoaderConfig;
use common::err::LResult;
use common::feed::{Feed, IngestPath};
use common::model::{Phase, ProgressEvent, RunStats, StatsSnapshot};
use common::time_util;
use session::cancel::CancelToken;
use session::manager::SessionManager;
use session::options::SessionRequest;
use session::vendor::VendorLink;
use writer::{DbDriver, TableWriter, WriterConfig};

use crate::pipeline::run_session;

/// What a trigger asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    /// Real-time specs into the real-time table family.
    RealTime,
    /// A same-day accumulated catch-up fetch.
    Historical,
    /// Wake the loop so it can notice cancellation.
    Shutdown,
}

/// Continuous polling over the real-time session.
#[derive(Debug, Clone)]
pub struct MonitorRequest {
    pub feed: Feed,
    /// Real-time data specs polled every cycle (0B12, 0B30, ...).
    pub realtime_specs: Vec<String>,
    /// Specs fetched on a historical trigger.
    pub historical_specs: Vec<String>,
    /// None takes the configured cadence.
    pub interval: Option<Duration>,
}

/// Control surface over a running monitor: snapshot, trigger, stop.
/// This is what the HTTP layer holds.
pub struct MonitorHandle {
    run_id: String,
    stats: Arc<RunStats>,
    trigger_tx: Sender<TriggerKind>,
    cancel: CancelToken,
    worker: Option<JoinHandle<LResult<()>>>,
}

impl MonitorHandle {
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Ask for a cycle now. The loop reacts within its poll wait.
    pub fn trigger(&self, kind: TriggerKind) {
        let _ = self.trigger_tx.send(kind);
    }

    /// Stop after the current cycle and collect the worker.
    pub fn stop(mut self) -> LResult<()> {
        self.cancel.cancel();
        let _ = self.trigger_tx.send(TriggerKind::Shutdown);
        match self.worker.take() {
            Some(worker) => worker
                .join()
                .map_err(|_| common::err::LoaderError::State("monitor worker panicked".to_string()))?,
            None => Ok(()),
        }
    }
}

/// Start the live monitor. Returns the control handle and the progress
/// event stream (one event per completed cycle).
pub fn monitor<L, D>(
    config: &LoaderConfig,
    mut link_factory: impl FnMut() -> LResult<L> + Send + 'static,
    driver: D,
    request: MonitorRequest,
    cancel: CancelToken,
) -> (MonitorHandle, ReceiverStream<ProgressEvent>)
where
    L: VendorLink + 'static,
    D: DbDriver + 'static,
{
    let run_id = Uuid::new_v4().to_string();
    let stats = Arc::new(RunStats::new());
    let (trigger_tx, trigger_rx) = channel::<TriggerKind>();
    let (event_tx, event_rx) = tokio::sync::mpsc::channel::<ProgressEvent>(64);

    let interval = request
        .interval
        .unwrap_or(Duration::from_secs(config.poll_interval_secs.max(1)));

    let worker_config = config.clone();
    let worker_stats = Arc::clone(&stats);
    let worker_cancel = cancel.clone();
    let worker_run_id = run_id.clone();
    let worker = thread::spawn(move || -> LResult<()> {
        let mut writer = TableWriter::new(
            driver,
            WriterConfig {
                batch_size: worker_config.effective_batch_size(),
                ..WriterConfig::default()
            },
            Arc::clone(&worker_stats),
        );

        info!(run_id = %worker_run_id, interval = ?interval, "live monitor starting");
        let mut next_kind = TriggerKind::RealTime;
        loop {
            if worker_cancel.is_cancelled() {
                break;
            }

            if let Err(err) = run_cycle(
                &worker_config,
                &mut link_factory,
                &mut writer,
                &request,
                next_kind,
                &worker_stats,
                &worker_cancel,
            ) {
                // a broken cycle must not kill the monitor
                warn!(%err, "monitor cycle failed");
            }
            let event = ProgressEvent::of(
                &worker_run_id,
                Phase::ChunkDone,
                &worker_stats.snapshot(),
            );
            let _ = event_tx.blocking_send(event);

            next_kind = match trigger_rx.recv_timeout(interval) {
                Ok(TriggerKind::Shutdown) => continue,
                Ok(kind) => kind,
                Err(RecvTimeoutError::Timeout) => TriggerKind::RealTime,
                Err(RecvTimeoutError::Disconnected) => break,
            };
        }

        writer.flush_all()?;
        let event = ProgressEvent::of(
            &worker_run_id,
            Phase::Completed,
            &worker_stats.snapshot(),
        );
        let _ = event_tx.blocking_send(event);
        info!(run_id = %worker_run_id, "live monitor stopped");
        Ok(())
    });

    let handle = MonitorHandle {
        run_id,
        stats,
        trigger_tx,
        cancel,
        worker: Some(worker),
    };
    (handle, ReceiverStream::new(event_rx))
}

fn run_cycle<L, D>(
    config: &LoaderConfig,
    link_factory: &mut impl FnMut() -> LResult<L>,
    writer: &mut TableWriter<D>,
    request: &MonitorRequest,
    kind: TriggerKind,
    stats: &Arc<RunStats>,
    cancel: &CancelToken,
) -> LResult<()>
where
    L: VendorLink + 'static,
    D: DbDriver,
{
    let today = Local::now().date_naive();
    let (specs, path) = match kind {
        TriggerKind::RealTime => (&request.realtime_specs, IngestPath::RealTime),
        TriggerKind::Historical => (&request.historical_specs, IngestPath::Accumulated),
        TriggerKind::Shutdown => return Ok(()),
    };

    for spec in specs {
        if cancel.is_cancelled() {
            break;
        }

        // one fresh session per spec per cycle; the vendor only returns
        // data newer than the previous real-time call
        let manager = SessionManager::new(link_factory()?, request.feed, config.session.clone());
        let session_request = match path {
            IngestPath::RealTime => SessionRequest::realtime(
                config.service_key.clone(),
                spec.clone(),
                time_util::yyyymmdd(today),
            ),
            IngestPath::Accumulated => SessionRequest::historical(
                config.service_key.clone(),
                spec.clone(),
                time_util::from_time(today),
            ),
        };

        run_session(
            manager,
            session_request,
            request.feed,
            path,
            writer,
            stats,
            cancel,
            None,
            || {},
        )?;
    }

    // real-time rows should be queryable as soon as the cycle ends
    writer.flush_all()?;
    Ok(())
}
