//! Collaborator settings.

use crate::protocol::AssistMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where the collaborators live and how long to wait for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistConfig {
    /// Base URL of the whiteboard API, e.g. `http://localhost:3030`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    pub default_mode: AssistMode,
    /// Artificial latency of the mock collaborators.
    pub mock_delay_ms: u64,
    /// Voice recordings stop on their own after this long.
    pub max_recording_secs: u64,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3030".to_string(),
            timeout_secs: 30,
            default_mode: AssistMode::General,
            mock_delay_ms: 500,
            max_recording_secs: 30,
        }
    }
}

impl AssistConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn mock_delay(&self) -> Duration {
        Duration::from_millis(self.mock_delay_ms)
    }

    pub fn max_recording(&self) -> Duration {
        Duration::from_secs(self.max_recording_secs)
    }
}
