use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use common::err::{LResult, LoaderError};
use common::model::RunStats;
use common::value::Value;
use record::parser::ParsedRecord;
use record::schema::{TableDef, TableRouter};

use crate::batch::BatchBuffer;
use crate::driver::DbDriver;

#[derive(Debug, Clone)]
pub struct WriterConfig {
    pub batch_size: usize,
    pub max_reconnect_attempts: u32,
    pub reconnect_backoff_ms: u64,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_reconnect_attempts: 5,
            reconnect_backoff_ms: 500,
        }
    }
}

/// Batched upsert writer. Owns the database connection exclusively.
///
/// Records arrive one at a time and are grouped per destination table;
/// a batch flushes when it reaches capacity, at run end, or on demand.
/// A flush is atomic: the whole batch commits, or rolls back and falls
/// back to row-at-a-time so only the genuinely bad rows are lost.
pub struct TableWriter<D: DbDriver> {
    driver: D,
    config: WriterConfig,
    stats: Arc<RunStats>,
    batches: HashMap<String, BatchBuffer>,
}

impl<D: DbDriver> TableWriter<D> {
    pub fn new(driver: D, config: WriterConfig, stats: Arc<RunStats>) -> Self {
        Self {
            driver,
            config,
            stats,
            batches: HashMap::new(),
        }
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// The run-scoped counters this writer reports into.
    pub fn stats(&self) -> Arc<RunStats> {
        Arc::clone(&self.stats)
    }

    /// Queue one record. Bad records (unknown table, missing column,
    /// null primary key) are counted `failed` and never abort the run.
    pub fn write(&mut self, record: ParsedRecord) -> LResult<()> {
        let table = record.table().to_string();
        let def = match TableRouter::schema(&table) {
            Some(def) => def,
            None => {
                warn!(table = %table, "record for unknown table");
                self.stats.add_failed(1);
                return Ok(());
            }
        };

        let row = match Self::bind_row(def, &record) {
            Ok(row) => row,
            Err(reason) => {
                warn!(table = %table, %reason, "record rejected");
                self.stats.add_failed(1);
                return Ok(());
            }
        };

        let capacity = self.config.batch_size;
        let batch = self
            .batches
            .entry(table.clone())
            .or_insert_with(|| BatchBuffer::new(table.clone(), capacity));
        if batch.push(row) {
            self.flush_table(&table)?;
        }
        Ok(())
    }

    /// Values in schema column order; every primary-key column present
    /// and non-null, every schema column present.
    fn bind_row(def: &TableDef, record: &ParsedRecord) -> Result<Vec<Value>, String> {
        for key in &def.pk {
            match record.get(key) {
                None | Some(Value::Null) => {
                    return Err(format!("missing primary key column {}", key));
                }
                Some(_) => {}
            }
        }

        let mut row = Vec::with_capacity(def.columns.len());
        for (name, _) in &def.columns {
            match record.get(name) {
                Some(value) => row.push(value.clone()),
                None => return Err(format!("missing column {}", name)),
            }
        }
        Ok(row)
    }

    pub fn flush_table(&mut self, table: &str) -> LResult<()> {
        self.flush_table_inner(table, true).map(|_| ())
    }

    /// Flush everything buffered, one flush round: the per-table commits
    /// stay separate (a batch never crosses tables) but the round counts
    /// once in the statistics.
    pub fn flush_all(&mut self) -> LResult<()> {
        let tables: Vec<String> = self.batches.keys().cloned().collect();
        let mut flushed_any = false;
        for table in tables {
            flushed_any |= self.flush_table_inner(&table, false)?;
        }
        if flushed_any {
            self.stats.add_batches(1);
        }
        Ok(())
    }

    fn flush_table_inner(&mut self, table: &str, count_batch: bool) -> LResult<bool> {
        let rows = match self.batches.get_mut(table) {
            None => return Ok(false),
            Some(batch) if batch.is_empty() => return Ok(false),
            Some(batch) => batch.take_rows(),
        };
        // the table came out of the router, the def is still there
        let def = TableRouter::schema(table).ok_or_else(|| {
            LoaderError::Schema(format!("table {} vanished from the catalogue", table))
        })?;

        let columns: Vec<String> = def.columns.iter().map(|(n, _)| n.clone()).collect();
        let sql = self.driver.upsert_template(table, &columns, &def.pk);
        self.flush_rows(&sql, def, rows, count_batch)?;
        Ok(true)
    }

    fn flush_rows(
        &mut self,
        sql: &str,
        def: &TableDef,
        rows: Vec<Vec<Value>>,
        count_batch: bool,
    ) -> LResult<()> {
        let count = rows.len();
        debug!(table = %def.name, rows = count, "flushing batch");

        match self.try_bulk(sql, &rows) {
            Ok(()) => {
                self.stats.add_imported(count as u64);
                if count_batch {
                    self.stats.add_batches(1);
                }
                return Ok(());
            }
            Err(err) => {
                warn!(table = %def.name, %err, "batch flush failed, rolling back");
                let _ = self.driver.rollback();
            }
        }

        if !self.driver.ping() {
            self.reconnect_with_backoff()?;
            // one whole-batch retry on the fresh connection
            if self.try_bulk(sql, &rows).is_ok() {
                self.stats.add_imported(count as u64);
                if count_batch {
                    self.stats.add_batches(1);
                }
                return Ok(());
            }
            let _ = self.driver.rollback();
        }

        self.per_row_fallback(sql, def, rows);
        if count_batch {
            self.stats.add_batches(1);
        }
        Ok(())
    }

    fn try_bulk(&mut self, sql: &str, rows: &[Vec<Value>]) -> LResult<()> {
        self.driver.begin()?;
        self.driver.bulk_exec(sql, rows)?;
        self.driver.commit()?;
        Ok(())
    }

    /// Row-at-a-time salvage after a failed batch; surviving rows are
    /// imported, the rest are logged by key and counted failed.
    fn per_row_fallback(&mut self, sql: &str, def: &TableDef, rows: Vec<Vec<Value>>) {
        let key_indexes: Vec<usize> = def
            .pk
            .iter()
            .filter_map(|key| def.columns.iter().position(|(n, _)| n == key))
            .collect();

        for row in rows {
            match self.driver.exec(sql, &row) {
                Ok(_) => self.stats.add_imported(1),
                Err(err) => {
                    let keys: Vec<String> = key_indexes
                        .iter()
                        .map(|i| format!("{:?}", row[*i]))
                        .collect();
                    warn!(table = %def.name, key = %keys.join("/"), %err, "row lost");
                    self.stats.add_failed(1);
                }
            }
        }
    }

    fn reconnect_with_backoff(&mut self) -> LResult<()> {
        for attempt in 0..self.config.max_reconnect_attempts {
            warn!(attempt, "database connection lost, reconnecting");
            if self.driver.reconnect().is_ok() && self.driver.ping() {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(
                self.config.reconnect_backoff_ms << attempt,
            ));
        }
        Err(LoaderError::Database(format!(
            "could not re-establish the connection after {} attempts",
            self.config.max_reconnect_attempts
        )))
    }
}
