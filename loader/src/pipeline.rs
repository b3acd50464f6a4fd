use std::collections::HashSet;
use std::sync::mpsc::{sync_channel, SyncSender};
use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use tracing::warn;

use common::buffer::RecordBuffer;
use common::err::{LResult, LoaderError};
use common::feed::{Feed, IngestPath};
use common::model::RunStats;
use common::value::Value;
use record::parser::{ParsedRecord, ParserRegistry};
use session::cancel::CancelToken;
use session::manager::{SessionManager, SessionSummary};
use session::options::SessionRequest;
use session::vendor::VendorLink;
use writer::{DbDriver, TableWriter};

/// Bound on in-flight records between the session worker and the writer.
const CHANNEL_DEPTH: usize = 1024;

pub struct PipelineOutcome {
    pub summary: SessionSummary,
    /// Fully delivered files, for the next attempt or chunk report.
    pub skip_files: HashSet<String>,
}

/// One session, producer/consumer style.
///
/// The manager reads records on its own thread and feeds a bounded
/// channel; this thread parses, filters and writes. A single writer is
/// deliberate: the transaction is the bottleneck and one writer keeps
/// commit order trivial.
#[allow(clippy::too_many_arguments)]
pub fn run_session<L, D>(
    mut manager: SessionManager<L>,
    request: SessionRequest,
    feed: Feed,
    path: IngestPath,
    writer: &mut TableWriter<D>,
    stats: &Arc<RunStats>,
    cancel: &CancelToken,
    to_date: Option<NaiveDate>,
    mut on_flush: impl FnMut(),
) -> LResult<PipelineOutcome>
where
    L: VendorLink + 'static,
    D: DbDriver,
{
    let (tx, rx) = sync_channel::<RecordBuffer>(CHANNEL_DEPTH);

    let producer_stats = Arc::clone(stats);
    let producer_cancel = cancel.clone();
    let producer = thread::spawn(move || {
        let result = manager.run(&request, &producer_cancel, |buffer| {
            producer_stats.set_last_file(buffer.file_name());
            producer_stats.add_fetched(1);
            feed_channel(&tx, buffer)
        });
        (result, manager.skip_files().clone())
    });

    let registry = ParserRegistry::for_feed(feed);
    let mut batches_seen = stats.snapshot().batches;
    let mut consumer_error: Option<LoaderError> = None;
    'consume: for buffer in rx.iter() {
        match registry.parse(path, &buffer) {
            Ok(rows) => {
                stats.add_parsed(rows.len() as u64);
                for row in rows {
                    if outside_range(&row, to_date) {
                        continue;
                    }
                    if let Err(err) = writer.write(row) {
                        consumer_error = Some(err);
                        break 'consume;
                    }
                }
            }
            Err(err) => {
                warn!(file = %buffer.file_name(), %err, "record not parsed");
                stats.add_failed(1);
            }
        }

        let batches = stats.snapshot().batches;
        if batches != batches_seen {
            batches_seen = batches;
            on_flush();
        }
    }
    // hanging up makes the producer's next send fail, which stops the
    // session even when we bailed mid-stream
    drop(rx);

    let (result, skip_files) = producer
        .join()
        .map_err(|_| LoaderError::State("session worker panicked".to_string()))?;
    if let Some(err) = consumer_error {
        return Err(err);
    }
    let summary = result?;

    stats.add_failed(summary.failed);
    stats.add_retries(summary.retries as u64);

    Ok(PipelineOutcome {
        summary,
        skip_files,
    })
}

fn feed_channel(tx: &SyncSender<RecordBuffer>, buffer: RecordBuffer) -> LResult<()> {
    // the consumer hanging up means the run is over, stop reading
    tx.send(buffer)
        .map_err(|_| LoaderError::Cancelled)
}

/// Client-side to-date filter. The vendor honours from_time but not
/// always to_time, so rows dated past the requested end are dropped
/// here. Rows without a race date (masters) always pass.
fn outside_range(row: &ParsedRecord, to_date: Option<NaiveDate>) -> bool {
    let to_date = match to_date {
        Some(d) => d,
        None => return false,
    };
    let year = match row.get("Year") {
        Some(Value::Int(y)) => *y,
        _ => return false,
    };
    let month_day = match row.get("MonthDay") {
        Some(Value::Text(md)) if md.len() == 4 => md.clone(),
        _ => return false,
    };
    let date_str = format!("{:04}{}", year, month_day);
    match NaiveDate::parse_from_str(&date_str, "%Y%m%d") {
        Ok(date) => date > to_date,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_filter_only_applies_to_dated_rows() {
        let mut row = ParsedRecord::new("NL_RA");
        row.insert("Year", Value::Int(2024));
        row.insert("MonthDay", Value::Text("0615".to_string()));

        let cut = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(outside_range(&row, Some(cut)));
        assert!(!outside_range(&row, Some(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())));
        assert!(!outside_range(&row, None));

        // master rows carry no race date and always pass
        let mut master = ParsedRecord::new("NL_UM");
        master.insert("KettoNum", Value::Text("2019100001".to_string()));
        assert!(!outside_range(&master, Some(cut)));
    }
}
