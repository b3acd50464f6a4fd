use std::collections::HashSet;
use std::path::PathBuf;
use std::process::Command;
use std::time::{Duration, Instant};

use pretty_duration::pretty_duration;
use tokio_stream::StreamExt;
use tracing::{info, warn};

use common::config::LoaderConfig;
use common::err::{LResult, LoaderError};
use common::feed::Feed;
use common::model::{Phase, ProgressEvent};
use common::time_util;
use loader::{BackfillRequest, MonitorRequest};
use session::cancel::CancelToken;
use session::child::{run_child, ChildResult};
use writer::driver::SqliteDriver;
use writer::{TableWriter, WriterConfig};

use crate::link::make_link;

pub struct SetupArgs {
    pub feed: Feed,
    pub spec: String,
    pub from: String,
    pub to: Option<String>,
    pub batch_size: Option<usize>,
    pub chunk_days: Option<u32>,
    pub isolate: bool,
    pub resume: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
}

pub fn run_init_db(config: &LoaderConfig) -> LResult<()> {
    let mut driver = SqliteDriver::connect(&config.db_path)?;
    let created = writer::ddl::create_all(&mut driver)?;
    info!(tables = created, db = %config.db_path, "schema ready");
    Ok(())
}

pub fn run_setup(config: &LoaderConfig, args: SetupArgs) -> LResult<()> {
    let from_date = time_util::parse_date(&args.from)?;
    let to_date = args.to.as_deref().map(time_util::parse_date).transpose()?;

    let mut request = BackfillRequest::new(args.feed, args.spec.clone(), from_date);
    request.to_date = to_date;
    request.batch_size = args.batch_size;
    request.chunk_days = args.chunk_days;
    request.resume_path = args
        .resume
        .as_ref()
        .and_then(|p| p.to_str())
        .map(|s| s.to_string());

    if args.isolate {
        return run_setup_isolated(config, &args, &request);
    }

    let mut driver = SqliteDriver::connect(&config.db_path)?;
    writer::ddl::create_all(&mut driver)?;

    let started = Instant::now();
    let cancel = CancelToken::new();
    let result = loader::run_backfill(
        config,
        || make_link(config),
        driver,
        &request,
        &cancel,
        print_progress,
    )?;

    info!(
        run_id = %result.run_id,
        took = %pretty_duration(&started.elapsed(), None),
        "setup finished"
    );
    println!("{}", common::pretty_util::to_string_pretty(&result)?);
    if result.completed_with_errors {
        warn!(
            failed = result.stats.failed,
            "completed with errors; see the log for the lost keys"
        );
    }
    Ok(())
}

/// Parent side of process isolation: one worker process per chunk, each
/// reporting back a single JSON line. A worker that dies or stalls is
/// retried with the chunk's skip set empty.
fn run_setup_isolated(
    config: &LoaderConfig,
    args: &SetupArgs,
    request: &BackfillRequest,
) -> LResult<()> {
    let to_date = request
        .to_date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let chunk_days = request
        .chunk_days
        .unwrap_or_else(|| request.feed.default_chunk_days());
    let chunks = time_util::split_chunks(request.from_date, to_date, chunk_days);
    let timeout = Duration::from_secs(config.session.child_timeout_secs);
    let exe = std::env::current_exe()?;

    let mut total_fetched: u64 = 0;
    for (chunk_start, _) in chunks {
        let mut skip_files: Vec<String> = Vec::new();
        let mut attempt = 0u32;
        loop {
            let mut command = Command::new(&exe);
            if let Some(path) = &args.config_path {
                command.arg("--config").arg(path);
            }
            command
                .arg("child")
                .arg("--feed")
                .arg(request.feed.to_string())
                .arg("--spec")
                .arg(&request.data_spec)
                .arg("--date")
                .arg(time_util::yyyymmdd(chunk_start))
                .arg("--to")
                .arg(time_util::yyyymmdd(to_date));
            for file in &skip_files {
                command.arg("--skip-file").arg(file);
            }

            match run_child(&mut command, timeout) {
                Ok(result) => {
                    info!(
                        chunk = %time_util::yyyymmdd(chunk_start),
                        fetched = result.records_fetched,
                        "chunk worker done"
                    );
                    total_fetched += result.records_fetched;
                    if result.completed {
                        break;
                    }
                    // worker gave up mid-chunk; carry its skip set forward
                    skip_files = result.skip_files;
                }
                Err(err) => {
                    warn!(chunk = %time_util::yyyymmdd(chunk_start), %err, "chunk worker failed");
                }
            }

            attempt += 1;
            if attempt >= config.session.max_retries {
                return Err(LoaderError::Child(format!(
                    "chunk {} failed {} times",
                    time_util::yyyymmdd(chunk_start),
                    attempt
                )));
            }
        }
    }

    info!(fetched = total_fetched, "isolated setup finished");
    Ok(())
}

/// The worker-process entry. Runs exactly one chunk in-process and
/// prints the result contract on stdout.
pub fn run_child_worker(
    config: &LoaderConfig,
    feed: Feed,
    spec: String,
    date: String,
    to: String,
    skip_files: Vec<String>,
) -> LResult<()> {
    let chunk_start = time_util::parse_date(&date)?;
    let to_date = time_util::parse_date(&to)?;

    let mut driver = SqliteDriver::connect(&config.db_path)?;
    writer::ddl::create_all(&mut driver)?;
    let mut writer = TableWriter::new(
        driver,
        WriterConfig {
            batch_size: config.effective_batch_size(),
            ..WriterConfig::default()
        },
        std::sync::Arc::new(common::model::RunStats::new()),
    );

    let request = BackfillRequest::new(feed, spec, chunk_start);
    let outcome = loader::run_chunk(
        config,
        make_link(config)?,
        &mut writer,
        &request,
        chunk_start,
        to_date,
        skip_files.into_iter().collect::<HashSet<String>>(),
        &CancelToken::new(),
        |_, _| {},
    )?;
    writer.flush_all()?;

    let result = ChildResult {
        records_fetched: outcome.summary.fetched,
        completed: outcome.summary.completed,
        skip_files: outcome.skip_files.into_iter().collect(),
    };
    println!("{}", result.to_json_line()?);
    Ok(())
}

pub fn run_monitor(
    config: &LoaderConfig,
    feed: Feed,
    specs: Vec<String>,
    interval: Option<u64>,
) -> LResult<()> {
    let mut driver = SqliteDriver::connect(&config.db_path)?;
    writer::ddl::create_all(&mut driver)?;

    let request = MonitorRequest {
        feed,
        realtime_specs: specs,
        historical_specs: vec![String::from("RACE")],
        interval: interval.map(Duration::from_secs),
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let cancel = CancelToken::new();
        let factory_config = config.clone();
        let (handle, mut events) = loader::monitor(
            config,
            move || make_link(&factory_config),
            driver,
            request,
            cancel.clone(),
        );
        info!(run_id = %handle.run_id(), "monitor running; ctrl-c stops it");

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("stopping monitor");
                    break;
                }
                event = events.next() => {
                    match event {
                        Some(event) => print_progress(event),
                        None => break,
                    }
                }
            }
        }
        handle.stop()
    })
}

fn print_progress(event: ProgressEvent) {
    match event.phase {
        Phase::Completed => info!(
            run_id = %event.run_id,
            imported = event.imported,
            failed = event.failed,
            "run complete"
        ),
        _ => info!(
            phase = %event.phase,
            fetched = event.fetched,
            parsed = event.parsed,
            imported = event.imported,
            failed = event.failed,
            batches = event.batches,
            retries = event.retries,
            file = %event.current_file,
            "progress"
        ),
    }
}
