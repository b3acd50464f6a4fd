use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::load_style::LoadStyle;
use crate::err::{LResult, LoaderError};

/// Loader 設定
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Vendor service key handed to `initialise`. The regional link
    /// ignores this and requires its own literal init key.
    pub service_key: String,

    /// SQLite file path, or ":memory:".
    pub db_path: String,

    /// Rows per batch flush.
    pub batch_size: usize,

    /// Backfill chunk width in days. 0 means the feed default.
    pub chunk_days: u32,

    /// Live monitor polling cadence in seconds.
    pub poll_interval_secs: u64,

    /// Port of the local control surface.
    pub http_port: u16,

    /// Log directory; None logs to stdout only.
    pub log_dir: Option<String>,

    pub debug: bool,

    pub session: SessionTuning,
}

/// Session manager knobs. Defaults are the documented policy values;
/// they exist as configuration for operators chasing a misbehaving link.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    /// Timeout around the vendor `open` call.
    pub open_timeout_secs: u64,

    /// No download progress for this long marks the session retryable.
    pub stall_timeout_secs: u64,

    /// Cadence of `status` polls while downloading.
    pub status_poll_ms: u64,

    /// Whole-session retry budget for retryable codes.
    pub max_retries: u32,

    /// Back-off after a rate-limit code.
    pub rate_limit_backoff_secs: u64,

    /// Wait between close and re-open on a download failure.
    pub reopen_wait_secs: u64,

    /// Upper bound on read_record iterations per session.
    pub read_loop_budget: u32,

    /// Per-chunk worker process timeout.
    pub child_timeout_secs: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            service_key: String::new(),
            db_path: "keiba.db".to_string(),
            batch_size: 1000,
            chunk_days: 0,
            poll_interval_secs: 30,
            http_port: 8765,
            log_dir: None,
            debug: false,
            session: SessionTuning::default(),
        }
    }
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            open_timeout_secs: 300,
            stall_timeout_secs: 60,
            status_poll_ms: 80,
            max_retries: 3,
            rate_limit_backoff_secs: 30,
            reopen_wait_secs: 10,
            read_loop_budget: 100_000,
            child_timeout_secs: 300,
        }
    }
}

impl LoaderConfig {
    pub fn load(path: &str, style: LoadStyle) -> LResult<Self> {
        match style {
            LoadStyle::DEFAULT => Ok(Self::default()),
            LoadStyle::YAML => Self::load_yaml(path),
        }
    }

    fn load_yaml(path: &str) -> LResult<Self> {
        if !Path::new(path).exists() {
            return Err(LoaderError::Config(format!(
                "config file not found: {}",
                path
            )));
        }
        let text = fs::read_to_string(path)?;
        let config: LoaderConfig = serde_yaml::from_str(&text)?;
        Ok(config)
    }

    /// Batch size with the documented floor of one row.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }
}
