use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use common::config::{LoaderConfig, SessionTuning};
use common::feed::Feed;
use record::k_type::RecordKind;
use record::parser::ParserRegistry;
use writer::driver::SqliteDriver;
use writer::DbDriver;

/// A throwaway database file, removed on drop. A file (not `:memory:`)
/// so a second connection can verify what a run wrote.
pub struct TempDb {
    pub path: PathBuf,
}

static DB_SEQ: AtomicU64 = AtomicU64::new(0);

impl TempDb {
    pub fn new(tag: &str) -> Self {
        let n = DB_SEQ.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "keiba-test-{}-{}-{}.db",
            tag,
            std::process::id(),
            n
        ));
        let _ = std::fs::remove_file(&path);
        Self { path }
    }

    pub fn path_str(&self) -> &str {
        self.path.to_str().unwrap()
    }

    /// A fresh connection with the whole catalogue created.
    pub fn driver(&self) -> SqliteDriver {
        let mut driver = SqliteDriver::connect(self.path_str()).unwrap();
        writer::ddl::create_all(&mut driver).unwrap();
        driver
    }

    pub fn count(&self, table: &str) -> i64 {
        let mut driver = SqliteDriver::connect(self.path_str()).unwrap();
        let rows = driver
            .query(&format!("SELECT COUNT(*) AS n FROM \"{}\"", table), &[])
            .unwrap();
        rows[0]["n"].as_int().unwrap()
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Config with every wait zeroed so retry paths run at test speed.
pub fn fast_config(db_path: &str) -> LoaderConfig {
    LoaderConfig {
        service_key: "SK-TEST".to_string(),
        db_path: db_path.to_string(),
        session: SessionTuning {
            open_timeout_secs: 5,
            stall_timeout_secs: 1,
            status_poll_ms: 1,
            max_retries: 3,
            rate_limit_backoff_secs: 0,
            reopen_wait_secs: 0,
            read_loop_budget: 100_000,
            child_timeout_secs: 5,
        },
        ..LoaderConfig::default()
    }
}

/// Build one record's bytes: the right length, the kind tag at the head,
/// spaces everywhere a field is not set.
pub fn record_bytes(feed: Feed, kind: RecordKind, fields: &[(&str, &str)]) -> Vec<u8> {
    let layout = ParserRegistry::for_feed(feed).layout(kind).unwrap();
    let mut data = vec![b' '; layout.record_len()];
    data[..2].copy_from_slice(kind.tag().as_bytes());

    for (name, value) in fields {
        let column = layout
            .columns()
            .into_iter()
            .filter(|f| {
                layout
                    .expand_repeat()
                    .map_or(true, |rep| !rep.fields.iter().any(|ef| ef.name == f.name))
            })
            .find(|f| f.name == *name)
            .unwrap_or_else(|| panic!("{} has no field {}", kind, name));
        write_at(&mut data, column.offset, column.len, value.as_bytes());
    }
    data
}

/// Fill one slot of the kind's expand block.
pub fn set_expand_slot(
    data: &mut [u8],
    feed: Feed,
    kind: RecordKind,
    slot: usize,
    subs: &[(&str, &str)],
) {
    let layout = ParserRegistry::for_feed(feed).layout(kind).unwrap();
    let rep = layout.expand_repeat().unwrap();
    for (name, value) in subs {
        let field = rep
            .fields
            .iter()
            .find(|f| f.name == *name)
            .unwrap_or_else(|| panic!("{} expand block has no field {}", kind, name));
        let offset = rep.offset + slot * rep.stride + field.offset;
        write_at(data, offset, field.len, value.as_bytes());
    }
}

/// Overwrite a single field with raw bytes (for encoding edge cases).
pub fn patch_field(data: &mut [u8], feed: Feed, kind: RecordKind, name: &str, raw: &[u8]) {
    let layout = ParserRegistry::for_feed(feed).layout(kind).unwrap();
    let column = layout
        .columns()
        .into_iter()
        .find(|f| f.name == name)
        .unwrap_or_else(|| panic!("{} has no field {}", kind, name));
    write_at(data, column.offset, column.len, raw);
}

fn write_at(data: &mut [u8], offset: usize, len: usize, value: &[u8]) {
    let n = value.len().min(len);
    data[offset..offset + n].copy_from_slice(&value[..n]);
}

/// The six race-key fields every race-scoped record needs.
pub fn race_key<'a>(jyo: &'a str, race_num: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("Year", "2024"),
        ("MonthDay", "0601"),
        ("JyoCD", jyo),
        ("Kaiji", "3"),
        ("Nichiji", "8"),
        ("RaceNum", race_num),
    ]
}
