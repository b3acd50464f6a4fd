use std::io;

use thiserror::Error;

/// Workspace-wide error. Recoverable classes are handled inside the
/// component that detects them and only show up in the run statistics;
/// what propagates out of the coordinator is one of these.
#[derive(Debug, Error)]
pub enum LoaderError {
    //////////////////////
    // Configuration
    //////////////////////
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid date `{0}`, expected YYYY-MM-DD or YYYYMMDD")]
    InvalidDate(String),

    //////////////////////
    // Vendor link
    //////////////////////
    /// Authentication class (-100, -301). Never retried.
    #[error("auth error (code {code}): {message}; remedy: {remedy}")]
    Auth {
        code: i32,
        message: String,
        remedy: String,
    },

    /// Transport class surfaced after the retry budget is spent.
    #[error("vendor error (code {code}): {message}")]
    Vendor { code: i32, message: String },

    #[error("retry budget exhausted after {retries} attempts, last code {code}: {message}")]
    RetryExhausted {
        code: i32,
        retries: u32,
        message: String,
    },

    #[error("{what} timed out after {seconds}s")]
    Timeout { what: String, seconds: u64 },

    //////////////////////
    // Parsing
    //////////////////////
    #[error("unknown record kind `{0}`")]
    UnknownKind(String),

    #[error("record buffer too short for kind `{kind}`: expected {expected} bytes, got {actual}")]
    BufferTooShort {
        kind: String,
        expected: usize,
        actual: usize,
    },

    #[error("field conversion failed for `{field}` of kind `{kind}`")]
    FieldConversion { kind: String, field: String },

    //////////////////////
    // Schema / writer
    //////////////////////
    #[error("schema error: {0}")]
    Schema(String),

    #[error("record for `{table}` is missing primary key column `{column}`")]
    MissingKey { table: String, column: String },

    #[error("database error: {0}")]
    Database(String),

    //////////////////////
    // Host / process
    //////////////////////
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("worker process failed: {0}")]
    Child(String),

    #[error("invalid session state: {0}")]
    State(String),

    #[error("cancelled")]
    Cancelled,
}

impl LoaderError {
    /// The operator-facing remedy hint, where one exists.
    pub fn remedy(&self) -> Option<&str> {
        match self {
            LoaderError::Auth { remedy, .. } => Some(remedy.as_str()),
            LoaderError::Config(_) => Some("check the loader configuration file"),
            _ => None,
        }
    }

    /// Originating vendor code, where one exists.
    pub fn vendor_code(&self) -> Option<i32> {
        match self {
            LoaderError::Auth { code, .. }
            | LoaderError::Vendor { code, .. }
            | LoaderError::RetryExhausted { code, .. } => Some(*code),
            _ => None,
        }
    }
}
