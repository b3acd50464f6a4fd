use std::collections::HashSet;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use common::buffer::RecordBuffer;
use common::config::SessionTuning;
use common::err::{LResult, LoaderError};
use common::feed::Feed;

use crate::cancel::CancelToken;
use crate::options::SessionRequest;
use crate::state::SessionState;
use crate::vendor::codes::{auth_error, classify, CodeClass};
use crate::vendor::link::{OpenInfo, VendorLink};

/// Read buffer handed to the vendor; comfortably above the longest
/// declared record.
pub const READ_BUFFER_SIZE: usize = 110_000;

/// What one `run` did.
#[derive(Debug, Clone, Default)]
pub struct SessionSummary {
    pub fetched: u64,
    /// Records lost to damaged files.
    pub failed: u64,
    /// Whole-session re-opens.
    pub retries: u32,
    pub cancelled: bool,
    /// End-of-stream reached.
    pub completed: bool,
}

/// Drives one vendor link through the session state machine.
///
/// Owns the link exclusively. The link is released on close, failure or
/// drop, whichever comes first; concurrent sessions are impossible by
/// construction.
pub struct SessionManager<L: VendorLink> {
    link: L,
    feed: Feed,
    tuning: SessionTuning,
    state: SessionState,
    transitions: Vec<SessionState>,
    skip_files: HashSet<String>,
    current_file: Option<String>,
    link_open: bool,
}

impl<L: VendorLink> SessionManager<L> {
    pub fn new(link: L, feed: Feed, tuning: SessionTuning) -> Self {
        Self {
            link,
            feed,
            tuning,
            state: SessionState::Uninitialised,
            transitions: vec![SessionState::Uninitialised],
            skip_files: HashSet::new(),
            current_file: None,
            link_open: false,
        }
    }

    /// Seed the skip-files set from a prior attempt so already-delivered
    /// data is not re-parsed.
    pub fn with_skip_files(mut self, skip_files: HashSet<String>) -> Self {
        self.skip_files = skip_files;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Every state this manager has been in, in order.
    pub fn transition_log(&self) -> &[SessionState] {
        &self.transitions
    }

    /// Files fully delivered so far; carried into a retry session.
    pub fn skip_files(&self) -> &HashSet<String> {
        &self.skip_files
    }

    /// Run one session to completion, delivering each record to
    /// `on_record` in the vendor's order.
    pub fn run(
        &mut self,
        request: &SessionRequest,
        cancel: &CancelToken,
        mut on_record: impl FnMut(RecordBuffer) -> LResult<()>,
    ) -> LResult<SessionSummary> {
        let result = self.run_inner(request, cancel, &mut on_record);
        self.release();
        result
    }

    fn run_inner(
        &mut self,
        request: &SessionRequest,
        cancel: &CancelToken,
        on_record: &mut dyn FnMut(RecordBuffer) -> LResult<()>,
    ) -> LResult<SessionSummary> {
        self.ensure_initialised(request)?;

        let mut summary = SessionSummary::default();
        let mut attempt: u32 = 0;
        let mut prev_download_count = i32::MAX;

        'session: loop {
            if cancel.is_cancelled() {
                summary.cancelled = true;
                self.transition(SessionState::Closed);
                return Ok(summary);
            }

            self.transition(SessionState::Opening);
            let open = match self.open_once(request)? {
                OpenOutcome::Opened(info) => info,
                OpenOutcome::Retry(code) => {
                    self.backoff_retry(code, &mut attempt, &mut summary, false)?;
                    continue 'session;
                }
            };
            debug!(
                read_count = open.read_count,
                download_count = open.download_count,
                "session opened"
            );

            // The regional link keeps already-fetched files cached, so a
            // shrinking announced download count is real progress and
            // resets the retry budget. Reaching zero is the completion
            // oracle for its busy-every-few-files failure mode.
            let made_progress = open.download_count < prev_download_count;
            prev_download_count = open.download_count;
            if made_progress {
                attempt = 0;
            }

            if open.download_count > 0 {
                self.transition(SessionState::Downloading);
                match self.wait_download(cancel)? {
                    WaitOutcome::Complete => {}
                    WaitOutcome::Cancelled => {
                        summary.cancelled = true;
                        self.transition(SessionState::Closed);
                        return Ok(summary);
                    }
                    WaitOutcome::Retry(code) => {
                        self.backoff_retry(code, &mut attempt, &mut summary, false)?;
                        continue 'session;
                    }
                }
            }

            self.transition(SessionState::Reading);
            let fetched_before = summary.fetched;
            let mut iterations: u32 = 0;
            loop {
                iterations += 1;
                if iterations > self.tuning.read_loop_budget {
                    self.transition(SessionState::Failed);
                    return Err(LoaderError::Vendor {
                        code: 0,
                        message: format!(
                            "read loop exceeded {} iterations",
                            self.tuning.read_loop_budget
                        ),
                    });
                }
                if cancel.is_cancelled() {
                    summary.cancelled = true;
                    self.transition(SessionState::Closed);
                    return Ok(summary);
                }

                let read = self.link.read_record(READ_BUFFER_SIZE);
                if read.code > 0 {
                    self.enter_file(&read.file_name);
                    if self.skip_files.contains(&read.file_name) {
                        self.link.skip();
                        continue;
                    }
                    summary.fetched += 1;
                    on_record(RecordBuffer::new(read.data, read.file_name))?;
                    continue;
                }

                match classify(read.code) {
                    CodeClass::Proceed => {
                        // code 0: end of stream
                        self.finish_file();
                        summary.completed = true;
                        self.transition(SessionState::Closed);
                        return Ok(summary);
                    }
                    CodeClass::Continue => {
                        if read.code == -1 {
                            self.finish_file();
                        } else {
                            // regional -3: the file is still on its way
                            thread::sleep(Duration::from_millis(self.tuning.status_poll_ms));
                        }
                    }
                    CodeClass::Corrupt => {
                        warn!(file = %read.file_name, code = read.code, "damaged file, deleting");
                        self.link.file_delete(&read.file_name);
                        summary.failed += 1;
                    }
                    CodeClass::RateLimited => {
                        info!("rate limited while reading, backing off");
                        thread::sleep(Duration::from_secs(self.tuning.rate_limit_backoff_secs));
                    }
                    CodeClass::Retryable => {
                        let progressed = summary.fetched > fetched_before;
                        self.backoff_retry(read.code, &mut attempt, &mut summary, progressed)?;
                        continue 'session;
                    }
                    CodeClass::Auth => {
                        self.transition(SessionState::Failed);
                        return Err(auth_error(self.feed, read.code));
                    }
                    CodeClass::Fatal => {
                        self.transition(SessionState::Failed);
                        return Err(LoaderError::Vendor {
                            code: read.code,
                            message: format!(
                                "fatal read error: {}",
                                crate::vendor::codes::describe(read.code)
                            ),
                        });
                    }
                }
            }
        }
    }

    fn ensure_initialised(&mut self, request: &SessionRequest) -> LResult<()> {
        if self.state != SessionState::Uninitialised {
            return Ok(());
        }
        let key = self
            .feed
            .required_init_key()
            .unwrap_or(request.service_key.as_str());
        let code = self.link.initialise(key);
        match classify(code) {
            CodeClass::Proceed => {
                self.transition(SessionState::Initialised);
                Ok(())
            }
            CodeClass::Auth => {
                self.transition(SessionState::Failed);
                Err(auth_error(self.feed, code))
            }
            _ => {
                self.transition(SessionState::Failed);
                Err(LoaderError::Vendor {
                    code,
                    message: "initialise failed".to_string(),
                })
            }
        }
    }

    fn open_once(&mut self, request: &SessionRequest) -> LResult<OpenOutcome> {
        let (code, info) = match &request.from_time {
            Some(from_time) => {
                let option = request.option.effective_for(self.feed);
                self.link.open(&request.data_spec, from_time, option)
            }
            None => {
                let (code, read_count) =
                    self.link.real_time_open(&request.data_spec, &request.realtime_key);
                (
                    code,
                    OpenInfo {
                        read_count,
                        download_count: 0,
                        last_file_ts: String::new(),
                    },
                )
            }
        };
        self.link_open = code >= 0;

        match classify(code) {
            CodeClass::Proceed => Ok(OpenOutcome::Opened(info)),
            CodeClass::Continue => Ok(OpenOutcome::Opened(info)),
            CodeClass::RateLimited | CodeClass::Retryable | CodeClass::Corrupt => {
                Ok(OpenOutcome::Retry(code))
            }
            CodeClass::Auth => {
                self.transition(SessionState::Failed);
                Err(auth_error(self.feed, code))
            }
            CodeClass::Fatal => {
                self.transition(SessionState::Failed);
                Err(LoaderError::Vendor {
                    code,
                    message: format!("open rejected for spec {}", request.data_spec),
                })
            }
        }
    }

    /// Poll `status` at the documented cadence until the download is done,
    /// yielding between polls for the vendor's asynchronous callbacks.
    fn wait_download(&mut self, cancel: &CancelToken) -> LResult<WaitOutcome> {
        let stall_limit = Duration::from_secs(self.tuning.stall_timeout_secs);
        let mut last_remaining = i32::MAX;
        let mut last_progress = Instant::now();

        loop {
            if cancel.is_cancelled() {
                return Ok(WaitOutcome::Cancelled);
            }

            let code = self.link.status();
            match classify(code) {
                CodeClass::Proceed => {
                    if code == 0 {
                        return Ok(WaitOutcome::Complete);
                    }
                    if code < last_remaining {
                        last_remaining = code;
                        last_progress = Instant::now();
                    } else if last_progress.elapsed() >= stall_limit {
                        warn!(remaining = code, "download stalled");
                        return Ok(WaitOutcome::Retry(code));
                    }
                }
                CodeClass::Continue => {}
                CodeClass::RateLimited => {
                    info!("download rate limited, backing off");
                    thread::sleep(Duration::from_secs(self.tuning.rate_limit_backoff_secs));
                    last_progress = Instant::now();
                }
                CodeClass::Corrupt | CodeClass::Retryable => {
                    return Ok(WaitOutcome::Retry(code));
                }
                CodeClass::Auth => {
                    self.transition(SessionState::Failed);
                    return Err(auth_error(self.feed, code));
                }
                CodeClass::Fatal => {
                    self.transition(SessionState::Failed);
                    return Err(LoaderError::Vendor {
                        code,
                        message: "download failed".to_string(),
                    });
                }
            }

            thread::yield_now();
            thread::sleep(Duration::from_millis(self.tuning.status_poll_ms));
        }
    }

    /// Close, wait, and let the caller re-open with the skip-files set
    /// preserved. Real progress resets the attempt budget.
    fn backoff_retry(
        &mut self,
        code: i32,
        attempt: &mut u32,
        summary: &mut SessionSummary,
        made_progress: bool,
    ) -> LResult<()> {
        self.transition(SessionState::FailedRetryable);
        self.close_link();
        // a half-read file must not land in the skip set
        self.current_file = None;
        summary.retries += 1;

        if made_progress {
            *attempt = 0;
        } else {
            *attempt += 1;
        }
        if *attempt >= self.tuning.max_retries {
            self.transition(SessionState::Failed);
            return Err(LoaderError::RetryExhausted {
                code,
                retries: summary.retries,
                message: "session kept failing without progress".to_string(),
            });
        }

        info!(
            code,
            attempt = *attempt,
            wait = self.tuning.reopen_wait_secs,
            "re-opening session"
        );
        thread::sleep(Duration::from_secs(self.tuning.reopen_wait_secs));
        Ok(())
    }

    /// A record from a new file means the previous file is fully
    /// delivered and safe to skip on a retry.
    fn enter_file(&mut self, file_name: &str) {
        match &self.current_file {
            Some(current) if current == file_name => {}
            _ => {
                self.finish_file();
                self.current_file = Some(file_name.to_string());
            }
        }
    }

    fn finish_file(&mut self) {
        if let Some(done) = self.current_file.take() {
            self.skip_files.insert(done);
        }
    }

    fn close_link(&mut self) {
        if self.link_open {
            self.link.close();
            self.link_open = false;
        }
    }

    fn release(&mut self) {
        self.close_link();
        if self.state.is_open() {
            self.transition(SessionState::Closed);
        }
    }

    fn transition(&mut self, to: SessionState) {
        if self.state != to {
            debug!(from = %self.state, to = %to, "session transition");
            self.state = to;
            self.transitions.push(to);
        }
    }
}

impl<L: VendorLink> Drop for SessionManager<L> {
    fn drop(&mut self) {
        self.close_link();
    }
}

enum OpenOutcome {
    Opened(OpenInfo),
    Retry(i32),
}

enum WaitOutcome {
    Complete,
    Cancelled,
    Retry(i32),
}
