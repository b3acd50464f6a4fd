use serde::Serialize;

/// The session state machine.
///
/// `Failed` is a sink; `FailedRetryable` is left by re-opening. `Closed`
/// is terminal for one session but a manager may open a fresh session
/// afterwards (the live monitor does, every cycle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Uninitialised,
    Initialised,
    Opening,
    Downloading,
    Reading,
    Closed,
    FailedRetryable,
    Failed,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Failed)
    }

    pub fn is_open(&self) -> bool {
        matches!(
            self,
            SessionState::Opening | SessionState::Downloading | SessionState::Reading
        )
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SessionState::Uninitialised => "uninitialised",
            SessionState::Initialised => "initialised",
            SessionState::Opening => "opening",
            SessionState::Downloading => "downloading",
            SessionState::Reading => "reading",
            SessionState::Closed => "closed",
            SessionState::FailedRetryable => "failed-retryable",
            SessionState::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}
