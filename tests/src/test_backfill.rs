use std::collections::VecDeque;

use common::err::LoaderError;
use common::feed::Feed;
use common::model::Phase;
use common::time_util::parse_date;
use loader::BackfillRequest;
use record::k_type::RecordKind;
use session::cancel::CancelToken;
use session::vendor::stub::{StubAttempt, StubLink, StubRead};
use writer::DbDriver;

use crate::util::{fast_config, patch_field, race_key, record_bytes, set_expand_slot, TempDb};

fn ra(feed: Feed, jyo: &str, race: &str) -> Vec<u8> {
    let mut fields = race_key(jyo, race);
    fields.push(("Hondai", "TEST STAKES"));
    fields.push(("Kyori", "1600"));
    fields.push(("TrackCD", "17"));
    record_bytes(feed, RecordKind::Ra, &fields)
}

fn se(feed: Feed, jyo: &str, race: &str, umaban: &str) -> Vec<u8> {
    let mut fields = race_key(jyo, race);
    fields.push(("Umaban", umaban));
    fields.push(("KettoNum", "2019104567"));
    fields.push(("Bamei", "TESTUMA"));
    fields.push(("KakuteiJyuni", "1"));
    record_bytes(feed, RecordKind::Se, &fields)
}

fn one_shot_factory(
    links: Vec<StubLink>,
) -> impl FnMut() -> Result<StubLink, LoaderError> {
    let mut queue: VecDeque<StubLink> = links.into();
    move || Ok(queue.pop_front().unwrap_or_default())
}

/// S1: one clean day of central race data.
#[test]
fn s1_central_clean_day() {
    let db = TempDb::new("s1");
    let driver = db.driver();
    let config = fast_config(db.path_str());

    let mut reads = Vec::new();
    for race in ["1", "2", "3"] {
        reads.push(StubRead::record("RACE0601.dat", ra(Feed::Central, "05", race)));
    }
    for race in ["1", "2", "3"] {
        for horse in 1..=16 {
            reads.push(StubRead::record(
                "RACE0601.dat",
                se(Feed::Central, "05", race, &horse.to_string()),
            ));
        }
    }
    let link = StubLink::new().attempt(StubAttempt::delivering(reads));

    let mut request = BackfillRequest::new(Feed::Central, "RACE", parse_date("2024-06-01").unwrap());
    request.to_date = Some(parse_date("2024-06-01").unwrap());

    let result = loader::run_backfill(
        &config,
        one_shot_factory(vec![link]),
        driver,
        &request,
        &CancelToken::new(),
        |_| {},
    )
    .unwrap();

    assert_eq!(result.stats.imported, 51);
    assert_eq!(result.stats.failed, 0);
    assert_eq!(result.stats.batches, 1);
    assert!(result.is_clean());

    assert_eq!(db.count("NL_RA"), 3);
    assert_eq!(db.count("NL_SE"), 48);

    // primary keys extracted from the record bytes
    let mut check = writer::driver::SqliteDriver::connect(db.path_str()).unwrap();
    let rows = check
        .query(
            "SELECT \"Year\", \"JyoCD\", \"RaceNum\" FROM \"NL_RA\" ORDER BY \"RaceNum\"",
            &[],
        )
        .unwrap();
    assert_eq!(rows[0]["Year"].as_int(), Some(2024));
    assert_eq!(rows[0]["JyoCD"].as_text(), Some("05"));
    assert_eq!(rows[2]["RaceNum"].as_int(), Some(3));
}

/// S2: feeding the same keys twice counts two writes but stores one row.
#[test]
fn s2_upsert_replaces() {
    let db = TempDb::new("s2");
    let driver = db.driver();
    let config = fast_config(db.path_str());

    let mut reads = Vec::new();
    for _ in 0..2 {
        for race in ["1", "2", "3"] {
            reads.push(StubRead::record("RACE0601.dat", ra(Feed::Central, "05", race)));
        }
    }
    let link = StubLink::new().attempt(StubAttempt::delivering(reads));

    let mut request = BackfillRequest::new(Feed::Central, "RACE", parse_date("2024-06-01").unwrap());
    request.to_date = Some(parse_date("2024-06-01").unwrap());

    let result = loader::run_backfill(
        &config,
        one_shot_factory(vec![link]),
        driver,
        &request,
        &CancelToken::new(),
        |_| {},
    )
    .unwrap();

    assert_eq!(result.stats.imported, 6);
    assert_eq!(db.count("NL_RA"), 3);
}

/// S3: regional download failure and recovery behind the skip set.
#[test]
fn s3_regional_502_recovery() {
    let db = TempDb::new("s3");
    let driver = db.driver();
    let config = fast_config(db.path_str());

    // first attempt: 20 one-record files, then the link gives up
    let mut first = Vec::new();
    for i in 1..=20 {
        first.push(StubRead::record(
            &format!("F{:02}.dat", i),
            ra(Feed::Regional, &format!("{:02}", i), "1"),
        ));
    }
    first.push(StubRead::Boundary);
    first.push(StubRead::code(-502, ""));

    // the re-opened session re-delivers everything plus ten new files
    let mut second = Vec::new();
    for i in 1..=30 {
        second.push(StubRead::record(
            &format!("F{:02}.dat", i),
            ra(Feed::Regional, &format!("{:02}", i), "1"),
        ));
    }

    let link = StubLink::new()
        .attempt(StubAttempt::delivering(first).with_download_count(30))
        .attempt(StubAttempt::delivering(second).with_download_count(0));
    let log = link.log();

    let from = parse_date("2025-01-01").unwrap();
    let mut request = BackfillRequest::new(Feed::Regional, "RACE", from);
    request.to_date = Some(from);

    let result = loader::run_backfill(
        &config,
        one_shot_factory(vec![link]),
        driver,
        &request,
        &CancelToken::new(),
        |_| {},
    )
    .unwrap();

    assert_eq!(result.stats.imported, 30);
    assert!(result.stats.retries >= 1);
    assert_eq!(db.count("NL_RA_REG"), 30, "no duplicates by primary key");
    // the 20 re-delivered files were skipped, not re-parsed
    assert_eq!(log.skips(), 20);
}

/// S4: a damaged file is deleted and the run carries on.
#[test]
fn s4_corrupt_file_local_recovery() {
    let db = TempDb::new("s4");
    let driver = db.driver();
    let config = fast_config(db.path_str());

    let mut reads = Vec::new();
    for i in 1..=16 {
        reads.push(StubRead::record(
            &format!("F{:02}.dat", i),
            ra(Feed::Central, &format!("{:02}", i), "1"),
        ));
    }
    reads.push(StubRead::code(-402, "F17.dat"));
    reads.push(StubRead::record("F18.dat", ra(Feed::Central, "18", "1")));

    let link = StubLink::new().attempt(StubAttempt::delivering(reads));
    let log = link.log();

    let from = parse_date("2024-06-01").unwrap();
    let mut request = BackfillRequest::new(Feed::Central, "RACE", from);
    request.to_date = Some(from);

    let result = loader::run_backfill(
        &config,
        one_shot_factory(vec![link]),
        driver,
        &request,
        &CancelToken::new(),
        |_| {},
    )
    .unwrap();

    assert_eq!(log.deleted_files(), vec!["F17.dat".to_string()]);
    assert_eq!(result.stats.failed, 1);
    assert_eq!(result.stats.imported, 17);
    assert!(result.completed_with_errors);
    assert_eq!(db.count("NL_RA"), 17);
}

/// S5: the implicit x10 odds scale lands in the stored row.
#[test]
fn s5_odds_scale() {
    let db = TempDb::new("s5");
    let driver = db.driver();
    let config = fast_config(db.path_str());

    let mut fields = race_key("05", "11");
    fields.push(("HappyoTime", "06011530"));
    let mut data = record_bytes(Feed::Central, RecordKind::O1, &fields);
    set_expand_slot(
        &mut data,
        Feed::Central,
        RecordKind::O1,
        0,
        &[("Umaban", "01"), ("TanOdds", "0035"), ("TanNinki", " 1")],
    );

    let link = StubLink::new().attempt(StubAttempt::delivering(vec![StubRead::record(
        "ODDS.dat", data,
    )]));

    let from = parse_date("2024-06-01").unwrap();
    let mut request = BackfillRequest::new(Feed::Central, "O1", from);
    request.to_date = Some(from);

    let result = loader::run_backfill(
        &config,
        one_shot_factory(vec![link]),
        driver,
        &request,
        &CancelToken::new(),
        |_| {},
    )
    .unwrap();

    // one occupied slot, the vacant 27 produce no rows
    assert_eq!(result.stats.imported, 1);
    assert_eq!(db.count("NL_O1"), 1);

    let mut check = writer::driver::SqliteDriver::connect(db.path_str()).unwrap();
    let rows = check
        .query(
            "SELECT \"TanOdds\" FROM \"NL_O1\" WHERE \"Umaban\" = ?",
            &[common::value::Value::Text("01".to_string())],
        )
        .unwrap();
    assert_eq!(rows[0]["TanOdds"], common::value::Value::Real(3.5));
}

/// Records no parser recognises count failed, the run continues.
#[test]
fn unknown_kind_is_counted_not_fatal() {
    let db = TempDb::new("unknown");
    let driver = db.driver();
    let config = fast_config(db.path_str());

    let link = StubLink::new().attempt(StubAttempt::delivering(vec![
        StubRead::record("F1.dat", b"ZZ mystery bytes".to_vec()),
        StubRead::record("F1.dat", ra(Feed::Central, "05", "1")),
    ]));

    let from = parse_date("2024-06-01").unwrap();
    let mut request = BackfillRequest::new(Feed::Central, "RACE", from);
    request.to_date = Some(from);

    let result = loader::run_backfill(
        &config,
        one_shot_factory(vec![link]),
        driver,
        &request,
        &CancelToken::new(),
        |_| {},
    )
    .unwrap();

    assert_eq!(result.stats.imported, 1);
    assert_eq!(result.stats.failed, 1);
    assert!(result.completed_with_errors);
}

/// Invalid Shift-JIS never costs a record; ASCII survives byte-for-byte.
#[test]
fn sjis_fallback_end_to_end() {
    let db = TempDb::new("sjis");
    let driver = db.driver();
    let config = fast_config(db.path_str());

    let mut data = record_bytes(
        Feed::Central,
        RecordKind::Um,
        &[("KettoNum", "2019104567")],
    );
    // 0x85 opens a double-byte sequence that 0xFF cannot close
    patch_field(
        &mut data,
        Feed::Central,
        RecordKind::Um,
        "Bamei",
        &[b'A', b'B', 0x85, 0xFF, b'C'],
    );

    let link = StubLink::new().attempt(StubAttempt::delivering(vec![StubRead::record(
        "DIFF.dat", data,
    )]));

    let from = parse_date("2024-06-01").unwrap();
    let mut request = BackfillRequest::new(Feed::Central, "DIFF", from);
    request.to_date = Some(from);

    let result = loader::run_backfill(
        &config,
        one_shot_factory(vec![link]),
        driver,
        &request,
        &CancelToken::new(),
        |_| {},
    )
    .unwrap();

    assert_eq!(result.stats.imported, 1);
    assert_eq!(result.stats.failed, 0);

    let mut check = writer::driver::SqliteDriver::connect(db.path_str()).unwrap();
    let rows = check.query("SELECT \"Bamei\" FROM \"NL_UM\"", &[]).unwrap();
    let bamei = rows[0]["Bamei"].as_text().unwrap();
    assert!(bamei.starts_with("AB"));
    assert!(bamei.ends_with('C'));
}

/// Progress counters only ever go up, and imported <= parsed <= fetched
/// at every observation point.
#[test]
fn progress_is_monotonic() {
    let db = TempDb::new("progress");
    let driver = db.driver();
    let config = fast_config(db.path_str());

    let mut reads = Vec::new();
    for race in ["1", "2", "3"] {
        reads.push(StubRead::record("RACE0601.dat", ra(Feed::Central, "05", race)));
        for horse in 1..=16 {
            reads.push(StubRead::record(
                "RACE0601.dat",
                se(Feed::Central, "05", race, &horse.to_string()),
            ));
        }
    }
    let link = StubLink::new().attempt(StubAttempt::delivering(reads));

    let from = parse_date("2024-06-01").unwrap();
    let mut request = BackfillRequest::new(Feed::Central, "RACE", from);
    request.to_date = Some(from);
    request.batch_size = Some(10);

    let mut events = Vec::new();
    loader::run_backfill(
        &config,
        one_shot_factory(vec![link]),
        driver,
        &request,
        &CancelToken::new(),
        |event| events.push(event),
    )
    .unwrap();

    assert!(
        events.iter().filter(|e| e.phase == Phase::Flushing).count() >= 2,
        "small batches should flush mid-run"
    );

    let mut last = (0u64, 0u64);
    for event in &events {
        assert!(event.fetched >= last.0, "fetched went backwards");
        assert!(event.imported >= last.1, "imported went backwards");
        assert!(event.imported <= event.parsed);
        assert!(event.parsed <= event.fetched);
        last = (event.fetched, event.imported);
    }
    assert_eq!(events.last().unwrap().phase, Phase::Completed);
}

/// Chunked runs persist their boundary and a restart skips clean chunks.
#[test]
fn resume_skips_completed_chunks() {
    let db = TempDb::new("resume");
    let resume_path = std::env::temp_dir().join(format!(
        "keiba-test-resume-{}.json",
        std::process::id()
    ));
    let resume_path = resume_path.to_str().unwrap().to_string();
    let _ = std::fs::remove_file(&resume_path);

    let config = fast_config(db.path_str());
    let from = parse_date("2024-06-01").unwrap();
    let to = parse_date("2024-06-02").unwrap();

    let mut request = BackfillRequest::new(Feed::Central, "RACE", from);
    request.to_date = Some(to);
    request.chunk_days = Some(1);
    request.resume_path = Some(resume_path.clone());

    // first run: two chunks, two sessions
    let links = vec![
        StubLink::new().attempt(StubAttempt::delivering(vec![StubRead::record(
            "F1.dat",
            ra(Feed::Central, "05", "1"),
        )])),
        StubLink::new().attempt(StubAttempt::delivering(vec![StubRead::record(
            "F2.dat",
            ra(Feed::Central, "06", "1"),
        )])),
    ];
    let result = loader::run_backfill(
        &config,
        one_shot_factory(links),
        db.driver(),
        &request,
        &CancelToken::new(),
        |_| {},
    )
    .unwrap();
    assert_eq!(result.last_chunk.as_deref(), Some("20240602"));
    assert_eq!(result.stats.imported, 2);

    // second run resumes past both clean chunks and opens no session
    let mut factory_calls = 0u32;
    let result = loader::run_backfill(
        &config,
        || {
            factory_calls += 1;
            Ok(StubLink::new())
        },
        db.driver(),
        &request,
        &CancelToken::new(),
        |_| {},
    )
    .unwrap();
    assert_eq!(factory_calls, 0, "both chunks were already clean");
    assert_eq!(result.stats.imported, 0);
    assert_eq!(db.count("NL_RA"), 2, "first run's rows are untouched");

    let _ = std::fs::remove_file(&resume_path);
}
