use std::collections::HashMap;
use std::sync::Arc;

use common::err::{LResult, LoaderError};
use common::model::RunStats;
use common::value::Value;
use record::parser::ParsedRecord;
use writer::driver::SqliteDriver;
use writer::{DbDriver, TableWriter, WriterConfig};

use crate::util::TempDb;

/// Delegates to SQLite but fails on request: once for a whole batch, or
/// for every row whose first bound value matches a poisoned key.
struct FlakyDriver {
    inner: SqliteDriver,
    fail_next_bulk: bool,
    poisoned_key: Option<Value>,
}

impl FlakyDriver {
    fn new(inner: SqliteDriver) -> Self {
        Self {
            inner,
            fail_next_bulk: false,
            poisoned_key: None,
        }
    }
}

impl DbDriver for FlakyDriver {
    fn exec(&mut self, sql: &str, params: &[Value]) -> LResult<usize> {
        if let Some(poisoned) = &self.poisoned_key {
            if params.last() == Some(poisoned) {
                return Err(LoaderError::Database("injected row failure".to_string()));
            }
        }
        self.inner.exec(sql, params)
    }

    fn query(&mut self, sql: &str, params: &[Value]) -> LResult<Vec<HashMap<String, Value>>> {
        self.inner.query(sql, params)
    }

    fn begin(&mut self) -> LResult<()> {
        self.inner.begin()
    }

    fn commit(&mut self) -> LResult<()> {
        self.inner.commit()
    }

    fn rollback(&mut self) -> LResult<()> {
        self.inner.rollback()
    }

    fn quote_identifier(&self, name: &str) -> String {
        self.inner.quote_identifier(name)
    }

    fn upsert_template(&self, table: &str, columns: &[String], pk: &[String]) -> String {
        self.inner.upsert_template(table, columns, pk)
    }

    fn bulk_exec(&mut self, sql: &str, rows: &[Vec<Value>]) -> LResult<usize> {
        if self.fail_next_bulk {
            self.fail_next_bulk = false;
            // partial work the rollback must undo
            let half = rows.len() / 2;
            let _ = self.inner.bulk_exec(sql, &rows[..half]);
            return Err(LoaderError::Database("injected bulk failure".to_string()));
        }
        self.inner.bulk_exec(sql, rows)
    }

    fn ping(&mut self) -> bool {
        self.inner.ping()
    }

    fn reconnect(&mut self) -> LResult<()> {
        self.inner.reconnect()
    }

    fn close(&mut self) -> LResult<()> {
        self.inner.close()
    }
}

fn hy_record(ketto: &str) -> ParsedRecord {
    let mut record = ParsedRecord::new("NL_HY");
    record.insert("RecordSpec", Value::Text("HY".to_string()));
    record.insert("DataKubun", Value::Text("1".to_string()));
    record.insert("MakeDate", Value::Text("20240601".to_string()));
    record.insert("KettoNum", Value::Text(ketto.to_string()));
    record.insert("Bamei", Value::Text(format!("UMA{}", ketto)));
    record.insert("Origin", Value::Text(ketto.to_string()));
    record
}

/// A failed batch commits nothing, then the per-row fallback salvages
/// every good row and reports exactly the bad ones.
#[test]
fn batch_atomicity_and_row_fallback() {
    let db = TempDb::new("atomic");
    let inner = db.driver();
    let mut driver = FlakyDriver::new(inner);
    driver.fail_next_bulk = true;
    // Origin binds last; poison one row by its value
    driver.poisoned_key = Some(Value::Text("2019100003".to_string()));

    let stats = Arc::new(RunStats::new());
    let mut writer = TableWriter::new(
        driver,
        WriterConfig {
            batch_size: 100,
            ..WriterConfig::default()
        },
        Arc::clone(&stats),
    );

    for i in 1..=5 {
        writer.write(hy_record(&format!("201910000{}", i))).unwrap();
    }
    writer.flush_all().unwrap();

    let snap = stats.snapshot();
    assert_eq!(snap.imported, 4, "four rows salvaged");
    assert_eq!(snap.failed, 1, "exactly the poisoned row reported");
    assert_eq!(db.count("NL_HY"), 4, "no partial batch left behind");
}

/// The fallback path reports each lost row but the run itself succeeds.
#[test]
fn clean_bulk_path_imports_everything() {
    let db = TempDb::new("bulk");
    let driver = FlakyDriver::new(db.driver());
    let stats = Arc::new(RunStats::new());
    let mut writer = TableWriter::new(driver, WriterConfig::default(), Arc::clone(&stats));

    for i in 1..=5 {
        writer.write(hy_record(&format!("201910000{}", i))).unwrap();
    }
    writer.flush_all().unwrap();

    assert_eq!(stats.snapshot().imported, 5);
    assert_eq!(stats.snapshot().failed, 0);
    assert_eq!(db.count("NL_HY"), 5);
}

/// A lost connection during flush reconnects with back-off and the whole
/// batch lands on the fresh connection.
#[test]
fn lost_connection_reconnects_and_retries_the_batch() {
    let db = TempDb::new("reconnect");
    let mut driver = LossyDriver {
        inner: FlakyDriver::new(db.driver()),
        drop_pings: 1,
    };
    driver.inner.fail_next_bulk = true;

    let stats = Arc::new(RunStats::new());
    let mut writer = TableWriter::new(driver, WriterConfig::default(), Arc::clone(&stats));

    for i in 1..=3 {
        writer.write(hy_record(&format!("201910000{}", i))).unwrap();
    }
    writer.flush_all().unwrap();

    assert_eq!(stats.snapshot().imported, 3);
    assert_eq!(stats.snapshot().failed, 0);
    assert_eq!(db.count("NL_HY"), 3);
}

/// Fails `ping` a set number of times to look like a dead connection.
struct LossyDriver {
    inner: FlakyDriver,
    drop_pings: u32,
}

impl DbDriver for LossyDriver {
    fn exec(&mut self, sql: &str, params: &[Value]) -> LResult<usize> {
        self.inner.exec(sql, params)
    }

    fn query(&mut self, sql: &str, params: &[Value]) -> LResult<Vec<HashMap<String, Value>>> {
        self.inner.query(sql, params)
    }

    fn begin(&mut self) -> LResult<()> {
        self.inner.begin()
    }

    fn commit(&mut self) -> LResult<()> {
        self.inner.commit()
    }

    fn rollback(&mut self) -> LResult<()> {
        self.inner.rollback()
    }

    fn quote_identifier(&self, name: &str) -> String {
        self.inner.quote_identifier(name)
    }

    fn upsert_template(&self, table: &str, columns: &[String], pk: &[String]) -> String {
        self.inner.upsert_template(table, columns, pk)
    }

    fn bulk_exec(&mut self, sql: &str, rows: &[Vec<Value>]) -> LResult<usize> {
        self.inner.bulk_exec(sql, rows)
    }

    fn ping(&mut self) -> bool {
        if self.drop_pings > 0 {
            self.drop_pings -= 1;
            return false;
        }
        self.inner.ping()
    }

    fn reconnect(&mut self) -> LResult<()> {
        self.inner.reconnect()
    }

    fn close(&mut self) -> LResult<()> {
        self.inner.close()
    }
}
