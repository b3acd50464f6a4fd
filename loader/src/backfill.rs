use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use chrono::{Duration, Local, NaiveDate};
use tracing::{error, info};
use uuid::Uuid;

use common::config::LoaderConfig;
use common::err::LResult;
use common::feed::{Feed, IngestPath};
use common::model::{Phase, ProgressEvent, RunResult, RunStats};
use common::time_util;
use session::cancel::CancelToken;
use session::manager::SessionManager;
use session::options::SessionRequest;
use session::vendor::VendorLink;
use writer::{DbDriver, TableWriter, WriterConfig};

use crate::pipeline::{run_session, PipelineOutcome};
use crate::resume::ResumeState;

/// One historical backfill request.
#[derive(Debug, Clone)]
pub struct BackfillRequest {
    pub feed: Feed,
    pub data_spec: String,
    pub from_date: NaiveDate,
    /// None runs up to today.
    pub to_date: Option<NaiveDate>,
    /// None takes the configured value.
    pub batch_size: Option<usize>,
    /// None takes the feed default (one day on the regional feed).
    pub chunk_days: Option<u32>,
    /// Path of the resume state file; None disables resumption.
    pub resume_path: Option<String>,
}

impl BackfillRequest {
    pub fn new(feed: Feed, data_spec: impl Into<String>, from_date: NaiveDate) -> Self {
        Self {
            feed,
            data_spec: data_spec.into(),
            from_date,
            to_date: None,
            batch_size: None,
            chunk_days: None,
            resume_path: None,
        }
    }
}

/// Historical backfill: split the range into chunks, run one session per
/// chunk with `option=setup`, filter past the end date client-side, and
/// persist the boundary after every chunk.
pub fn run_backfill<L, D>(
    config: &LoaderConfig,
    mut link_factory: impl FnMut() -> LResult<L>,
    driver: D,
    request: &BackfillRequest,
    cancel: &CancelToken,
    mut on_progress: impl FnMut(ProgressEvent),
) -> LResult<RunResult>
where
    L: VendorLink + 'static,
    D: DbDriver,
{
    let run_id = Uuid::new_v4().to_string();
    let started = Instant::now();
    let stats = Arc::new(RunStats::new());
    let mut writer = TableWriter::new(
        driver,
        WriterConfig {
            batch_size: request.batch_size.unwrap_or(config.effective_batch_size()),
            ..WriterConfig::default()
        },
        Arc::clone(&stats),
    );

    let to_date = request
        .to_date
        .unwrap_or_else(|| Local::now().date_naive());
    let chunk_days = request
        .chunk_days
        .or((config.chunk_days > 0).then_some(config.chunk_days))
        .unwrap_or_else(|| request.feed.default_chunk_days());

    let start_date = resume_start(request).unwrap_or(request.from_date);
    let chunks = time_util::split_chunks(start_date, to_date, chunk_days);
    info!(
        run_id = %run_id,
        feed = %request.feed,
        spec = %request.data_spec,
        chunks = chunks.len(),
        "backfill starting"
    );

    let mut last_chunk: Option<String> = None;
    let mut cancelled = false;

    for (chunk_start, _chunk_end) in &chunks {
        if cancel.is_cancelled() {
            cancelled = true;
            break;
        }

        let outcome = run_chunk(
            config,
            link_factory()?,
            &mut writer,
            request,
            *chunk_start,
            to_date,
            HashSet::new(),
            cancel,
            |phase, stats| on_progress(ProgressEvent::of(&run_id, phase, stats)),
        );

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                // flush what made it through before surfacing
                let _ = writer.flush_all();
                let snapshot = stats.snapshot();
                error!(
                    run_id = %run_id,
                    chunk = %time_util::yyyymmdd(*chunk_start),
                    last_chunk = ?last_chunk,
                    imported = snapshot.imported,
                    failed = snapshot.failed,
                    %err,
                    "backfill failed"
                );
                return Err(err);
            }
        };

        if outcome.summary.cancelled {
            cancelled = true;
            break;
        }

        last_chunk = Some(time_util::yyyymmdd(*chunk_start));
        persist_resume(request, *chunk_start);
        on_progress(ProgressEvent::of(&run_id, Phase::ChunkDone, &stats.snapshot()));
    }

    writer.flush_all()?;
    let snapshot = stats.snapshot();
    on_progress(ProgressEvent::of(&run_id, Phase::Completed, &snapshot));

    let result = RunResult {
        run_id,
        completed_with_errors: snapshot.failed > 0,
        cancelled,
        last_chunk,
        duration_secs: started.elapsed().as_secs(),
        stats: snapshot,
    };
    info!(
        imported = result.stats.imported,
        failed = result.stats.failed,
        clean = result.is_clean(),
        "backfill finished"
    );
    Ok(result)
}

/// One chunk over an existing writer. Also the unit a chunk worker
/// process runs; the skip set seeds a re-spawned worker.
#[allow(clippy::too_many_arguments)]
pub fn run_chunk<L, D>(
    config: &LoaderConfig,
    link: L,
    writer: &mut TableWriter<D>,
    request: &BackfillRequest,
    chunk_start: NaiveDate,
    to_date: NaiveDate,
    skip_files: HashSet<String>,
    cancel: &CancelToken,
    mut on_flush: impl FnMut(Phase, &common::model::StatsSnapshot),
) -> LResult<PipelineOutcome>
where
    L: VendorLink + 'static,
    D: DbDriver,
{
    let manager = SessionManager::new(link, request.feed, config.session.clone())
        .with_skip_files(skip_files);
    let session_request = SessionRequest::historical(
        config.service_key.clone(),
        request.data_spec.clone(),
        time_util::from_time(chunk_start),
    );

    let stats = writer.stats();
    run_session(
        manager,
        session_request,
        request.feed,
        IngestPath::Accumulated,
        writer,
        &stats,
        cancel,
        Some(to_date),
        || {
            let snapshot = stats.snapshot();
            on_flush(Phase::Flushing, &snapshot);
        },
    )
}

fn resume_start(request: &BackfillRequest) -> Option<NaiveDate> {
    let path = request.resume_path.as_deref()?;
    let state = ResumeState::load(path)?;
    if !state.applies_to(request.feed, &request.data_spec) {
        return None;
    }
    let last = time_util::parse_date(&state.last_chunk).ok()?;
    let next = last + Duration::days(1);
    info!(resume_from = %next, "resuming behind the last clean chunk");
    Some(next.max(request.from_date))
}

fn persist_resume(request: &BackfillRequest, chunk_start: NaiveDate) {
    if let Some(path) = request.resume_path.as_deref() {
        let state = ResumeState {
            feed: request.feed,
            data_spec: request.data_spec.clone(),
            last_chunk: time_util::yyyymmdd(chunk_start),
        };
        if let Err(err) = state.store(path) {
            tracing::warn!(%err, "could not persist resume state");
        }
    }
}
