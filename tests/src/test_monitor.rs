use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tokio_stream::StreamExt;

use common::feed::Feed;
use loader::{MonitorRequest, TriggerKind};
use record::k_type::RecordKind;
use session::cancel::CancelToken;
use session::vendor::stub::{StubAttempt, StubLink, StubRead};

use crate::util::{fast_config, race_key, record_bytes, TempDb};

fn wh(jyo: &str, race: &str, time: &str) -> Vec<u8> {
    let mut fields = race_key(jyo, race);
    fields.push(("HappyoTime", time));
    record_bytes(Feed::Central, RecordKind::Wh, &fields)
}

/// S6: a trigger starts a cycle well inside one second, its records land
/// in the real-time family, and the status snapshot reflects them.
#[tokio::test(flavor = "multi_thread")]
async fn s6_trigger_starts_a_cycle_immediately() {
    let db = TempDb::new("s6");
    let driver = db.driver();
    let config = fast_config(db.path_str());

    // cycle 1 delivers nothing; the triggered cycle delivers two records
    let links = vec![
        StubLink::new().attempt(StubAttempt::delivering(vec![])),
        StubLink::new().attempt(StubAttempt::delivering(vec![
            StubRead::record("RT1.dat", wh("05", "11", "06011510")),
            StubRead::record("RT1.dat", wh("05", "12", "06011512")),
        ])),
    ];
    let mut queue: VecDeque<StubLink> = links.into();

    let request = MonitorRequest {
        feed: Feed::Central,
        realtime_specs: vec!["0B12".to_string()],
        historical_specs: vec![],
        interval: Some(Duration::from_secs(60)),
    };

    let cancel = CancelToken::new();
    let (handle, mut events) = loader::monitor(
        &config,
        move || Ok(queue.pop_front().unwrap_or_default()),
        driver,
        request,
        cancel.clone(),
    );

    // the first cycle runs on startup
    let first = events.next().await.expect("first cycle event");
    assert_eq!(first.imported, 0);

    let triggered_at = Instant::now();
    handle.trigger(TriggerKind::RealTime);

    let second = tokio::time::timeout(Duration::from_secs(2), events.next())
        .await
        .expect("triggered cycle should not wait for the 60s cadence")
        .expect("second cycle event");
    assert!(triggered_at.elapsed() < Duration::from_secs(2));
    assert_eq!(second.imported, 2);

    // the status snapshot agrees with the event stream
    assert_eq!(handle.snapshot().imported, 2);

    let stopper = tokio::task::spawn_blocking(move || handle.stop());
    stopper.await.unwrap().unwrap();

    // the records went to the real-time family, not the accumulated one
    assert_eq!(db.count("RT_WH"), 2);
    assert_eq!(db.count("NL_WH"), 0);
}

/// A historical trigger runs the accumulated path: same writer, same
/// upsert semantics, `NL_` destinations.
#[tokio::test(flavor = "multi_thread")]
async fn historical_trigger_uses_the_accumulated_family() {
    let db = TempDb::new("hist-trigger");
    let driver = db.driver();
    let config = fast_config(db.path_str());

    let links = vec![
        // startup realtime cycle
        StubLink::new().attempt(StubAttempt::delivering(vec![])),
        // triggered historical catch-up
        StubLink::new().attempt(StubAttempt::delivering(vec![StubRead::record(
            "RACE.dat",
            wh("06", "1", "06011000"),
        )])),
    ];
    let mut queue: VecDeque<StubLink> = links.into();

    let request = MonitorRequest {
        feed: Feed::Central,
        realtime_specs: vec!["0B12".to_string()],
        historical_specs: vec!["RACE".to_string()],
        interval: Some(Duration::from_secs(60)),
    };

    let cancel = CancelToken::new();
    let (handle, mut events) = loader::monitor(
        &config,
        move || Ok(queue.pop_front().unwrap_or_default()),
        driver,
        request,
        cancel.clone(),
    );

    let _ = events.next().await.expect("startup cycle");
    handle.trigger(TriggerKind::Historical);
    let after = tokio::time::timeout(Duration::from_secs(2), events.next())
        .await
        .expect("triggered cycle")
        .expect("event");
    assert_eq!(after.imported, 1);

    let stopper = tokio::task::spawn_blocking(move || handle.stop());
    stopper.await.unwrap().unwrap();

    assert_eq!(db.count("NL_WH"), 1);
    assert_eq!(db.count("RT_WH"), 0);
}
