pub mod sqlite;

use std::collections::HashMap;

use common::err::LResult;
use common::value::Value;

pub use sqlite::SqliteDriver;

/// The capability set the writer relies on, nothing more.
///
/// One implementation wraps the embedded single-file engine; a
/// client-server implementation slots in behind the same surface. The
/// writer never branches on which one it holds — dialect differences live
/// in `quote_identifier` and `upsert_template`.
pub trait DbDriver: Send {
    fn exec(&mut self, sql: &str, params: &[Value]) -> LResult<usize>;

    fn query(&mut self, sql: &str, params: &[Value]) -> LResult<Vec<HashMap<String, Value>>>;

    fn begin(&mut self) -> LResult<()>;
    fn commit(&mut self) -> LResult<()>;
    fn rollback(&mut self) -> LResult<()>;

    /// Quote one identifier. Column names with digits or non-ASCII
    /// codepoints must pass through this in every generated statement.
    fn quote_identifier(&self, name: &str) -> String;

    /// The driver-specific insert-or-replace statement with one `?`
    /// placeholder per column, bound in the given column order.
    fn upsert_template(&self, table: &str, columns: &[String], pk: &[String]) -> String;

    /// Execute one prepared statement over many parameter rows. Runs
    /// inside whatever transaction is open.
    fn bulk_exec(&mut self, sql: &str, rows: &[Vec<Value>]) -> LResult<usize>;

    /// Cheap liveness probe, used to tell a broken statement from a lost
    /// connection.
    fn ping(&mut self) -> bool;

    /// Drop and re-establish the connection.
    fn reconnect(&mut self) -> LResult<()>;

    fn close(&mut self) -> LResult<()>;
}
