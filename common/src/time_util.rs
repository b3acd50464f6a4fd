use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{Duration, Local, NaiveDate};

use crate::err::{LResult, LoaderError};

/// 現在時刻の秒数
pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs()
}

/// 現在時刻の整形出力
pub fn now_str() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Parse an operator-supplied date, `YYYY-MM-DD` or compact `YYYYMMDD`.
pub fn parse_date(s: &str) -> LResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y%m%d"))
        .map_err(|_| LoaderError::InvalidDate(s.to_string()))
}

/// The vendor `from_time` form: YYYYMMDDhhmmss at midnight of `date`.
pub fn from_time(date: NaiveDate) -> String {
    format!("{}000000", date.format("%Y%m%d"))
}

/// Compact YYYYMMDD form used for record keys and progress reporting.
pub fn yyyymmdd(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Split `[from, to]` (inclusive) into chunks of at most `chunk_days` days.
/// Returns `(chunk_start, chunk_end)` pairs, both inclusive.
pub fn split_chunks(from: NaiveDate, to: NaiveDate, chunk_days: u32) -> Vec<(NaiveDate, NaiveDate)> {
    let chunk_days = chunk_days.max(1) as i64;
    let mut chunks = Vec::new();
    let mut start = from;
    while start <= to {
        let end = (start + Duration::days(chunk_days - 1)).min(to);
        chunks.push((start, end));
        start = end + Duration::days(1);
    }
    chunks
}
