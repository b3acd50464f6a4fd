use std::collections::HashMap;

use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection};

use common::err::{LResult, LoaderError};
use common::value::Value;

use crate::driver::DbDriver;

/// Embedded single-file engine. The upsert dialect is a single
/// `INSERT OR REPLACE` statement.
pub struct SqliteDriver {
    path: String,
    conn: Connection,
}

impl SqliteDriver {
    /// `":memory:"` opens a private in-memory database.
    pub fn connect(path: &str) -> LResult<Self> {
        let conn = open(path)?;
        Ok(Self {
            path: path.to_string(),
            conn,
        })
    }

    fn to_sql(value: &Value) -> rusqlite::types::Value {
        match value {
            Value::Int(v) => rusqlite::types::Value::Integer(*v),
            Value::Real(v) => rusqlite::types::Value::Real(*v),
            Value::Text(v) => rusqlite::types::Value::Text(v.clone()),
            Value::Null => rusqlite::types::Value::Null,
        }
    }

    fn from_sql(value: ValueRef<'_>) -> Value {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(v) => Value::Int(v),
            ValueRef::Real(v) => Value::Real(v),
            ValueRef::Text(v) => Value::Text(String::from_utf8_lossy(v).into_owned()),
            ValueRef::Blob(v) => Value::Text(String::from_utf8_lossy(v).into_owned()),
        }
    }
}

fn open(path: &str) -> LResult<Connection> {
    let conn = Connection::open(path).map_err(db_err)?;
    // upserts are bursty; let readers wait instead of failing
    conn.busy_timeout(std::time::Duration::from_secs(5))
        .map_err(db_err)?;
    Ok(conn)
}

fn db_err(err: rusqlite::Error) -> LoaderError {
    LoaderError::Database(err.to_string())
}

impl DbDriver for SqliteDriver {
    fn exec(&mut self, sql: &str, params: &[Value]) -> LResult<usize> {
        let bound = params.iter().map(Self::to_sql);
        self.conn
            .execute(sql, params_from_iter(bound))
            .map_err(db_err)
    }

    fn query(&mut self, sql: &str, params: &[Value]) -> LResult<Vec<HashMap<String, Value>>> {
        let mut stmt = self.conn.prepare(sql).map_err(db_err)?;
        let names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();

        let bound = params.iter().map(Self::to_sql);
        let mut rows = stmt.query(params_from_iter(bound)).map_err(db_err)?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(db_err)? {
            let mut map = HashMap::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
                let value = row.get_ref(i).map_err(db_err)?;
                map.insert(name.clone(), Self::from_sql(value));
            }
            out.push(map);
        }
        Ok(out)
    }

    fn begin(&mut self) -> LResult<()> {
        self.conn.execute_batch("BEGIN").map_err(db_err)
    }

    fn commit(&mut self) -> LResult<()> {
        self.conn.execute_batch("COMMIT").map_err(db_err)
    }

    fn rollback(&mut self) -> LResult<()> {
        self.conn.execute_batch("ROLLBACK").map_err(db_err)
    }

    fn quote_identifier(&self, name: &str) -> String {
        // double-quote form; embedded quotes doubled
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    fn upsert_template(&self, table: &str, columns: &[String], pk: &[String]) -> String {
        // primary-key conflict resolution is implicit in this dialect
        let _ = pk;
        let quoted: Vec<String> = columns.iter().map(|c| self.quote_identifier(c)).collect();
        let placeholders: Vec<&str> = columns.iter().map(|_| "?").collect();
        format!(
            "INSERT OR REPLACE INTO {} ({}) VALUES ({})",
            self.quote_identifier(table),
            quoted.join(", "),
            placeholders.join(", ")
        )
    }

    fn bulk_exec(&mut self, sql: &str, rows: &[Vec<Value>]) -> LResult<usize> {
        let mut stmt = self.conn.prepare_cached(sql).map_err(db_err)?;
        let mut affected = 0;
        for row in rows {
            let bound = row.iter().map(Self::to_sql);
            affected += stmt.execute(params_from_iter(bound)).map_err(db_err)?;
        }
        Ok(affected)
    }

    fn ping(&mut self) -> bool {
        self.conn
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .is_ok()
    }

    fn reconnect(&mut self) -> LResult<()> {
        self.conn = open(&self.path)?;
        Ok(())
    }

    fn close(&mut self) -> LResult<()> {
        // rusqlite closes on drop; a fresh handle keeps self usable
        Ok(())
    }
}
