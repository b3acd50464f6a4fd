use std::collections::HashSet;
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::warn;

use common::err::{LResult, LoaderError};

/// The whole contract between a chunk worker process and its parent: one
/// JSON line on stdout at termination.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChildResult {
    pub records_fetched: u64,
    pub completed: bool,
    pub skip_files: Vec<String>,
}

impl ChildResult {
    pub fn to_json_line(&self) -> LResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse the last non-empty line of a worker's output.
    pub fn from_output(output: &str) -> LResult<Self> {
        let line = output
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .ok_or_else(|| LoaderError::Child("worker produced no result line".to_string()))?;
        Ok(serde_json::from_str(line.trim())?)
    }

    pub fn skip_files_set(&self) -> HashSet<String> {
        self.skip_files.iter().cloned().collect()
    }
}

/// Spawn one chunk worker and collect its result line.
///
/// The vendor object leaks over long runs, so a session can be hosted in
/// a short-lived process: the parent hands a date range over argv,
/// collects the JSON result, then spawns the next worker. A worker that
/// exceeds `timeout` is killed and the chunk counts as retryable.
pub fn run_child(command: &mut Command, timeout: Duration) -> LResult<ChildResult> {
    let mut child = command
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()?;

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait()? {
            Some(status) => {
                let output = drain_stdout(&mut child)?;
                if !status.success() {
                    return Err(LoaderError::Child(format!(
                        "worker exited with {}: {}",
                        status,
                        output.trim()
                    )));
                }
                return ChildResult::from_output(&output);
            }
            None => {
                if Instant::now() >= deadline {
                    warn!("chunk worker timed out, killing");
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(LoaderError::Timeout {
                        what: "chunk worker".to_string(),
                        seconds: timeout.as_secs(),
                    });
                }
                thread::sleep(Duration::from_millis(50));
            }
        }
    }
}

fn drain_stdout(child: &mut Child) -> LResult<String> {
    let mut output = String::new();
    if let Some(stdout) = child.stdout.as_mut() {
        stdout.read_to_string(&mut output)?;
    }
    Ok(output)
}
