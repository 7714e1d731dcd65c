use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing and capacity knobs for incremental highlighting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerSettings {
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_pending_capacity")]
    pub pending_capacity: usize,
}

impl SchedulerSettings {
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            throttle_ms: default_throttle_ms(),
            debounce_ms: default_debounce_ms(),
            pending_capacity: default_pending_capacity(),
        }
    }
}

fn default_throttle_ms() -> u64 {
    250
}

fn default_debounce_ms() -> u64 {
    120
}

fn default_pending_capacity() -> usize {
    2000
}
