use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use common::err::LResult;
use common::feed::Feed;

/// Where a backfill got to, persisted after every chunk so an
/// interrupted run picks up behind the last clean boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeState {
    pub feed: Feed,
    pub data_spec: String,
    /// Last chunk start that finished cleanly, YYYYMMDD.
    pub last_chunk: String,
}

impl ResumeState {
    pub fn load(path: &str) -> Option<ResumeState> {
        if !Path::new(path).exists() {
            return None;
        }
        match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(state) => Some(state),
                Err(err) => {
                    warn!(%err, "resume state unreadable, starting fresh");
                    None
                }
            },
            Err(err) => {
                warn!(%err, "resume state unreadable, starting fresh");
                None
            }
        }
    }

    pub fn store(&self, path: &str) -> LResult<()> {
        let text = serde_json::to_string(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// A state file only applies to the run it was written by.
    pub fn applies_to(&self, feed: Feed, data_spec: &str) -> bool {
        self.feed == feed && self.data_spec == data_spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_through_a_file() {
        let path = std::env::temp_dir().join("keiba-resume-test.json");
        let path = path.to_str().unwrap();

        let state = ResumeState {
            feed: Feed::Regional,
            data_spec: "RACE".to_string(),
            last_chunk: "20250101".to_string(),
        };
        state.store(path).unwrap();

        let loaded = ResumeState::load(path).unwrap();
        assert_eq!(loaded.last_chunk, "20250101");
        assert!(loaded.applies_to(Feed::Regional, "RACE"));
        assert!(!loaded.applies_to(Feed::Central, "RACE"));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_file_is_none() {
        assert!(ResumeState::load("/no/such/resume.json").is_none());
    }
}
