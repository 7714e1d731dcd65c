use phrasemark_core::types::SchedulerSettings;
use std::time::Duration;

/// Scheduler tuning passed to [`Scheduler::new`](crate::Scheduler::new).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Minimum spacing between throttled flushes.
    pub throttle: Duration,
    /// Quiet period after the last insertion before the trailing flush.
    pub debounce: Duration,
    /// Most nodes held for one flush; further insertions are dropped.
    pub pending_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::from(&SchedulerSettings::default())
    }
}

impl From<&SchedulerSettings> for SchedulerConfig {
    fn from(settings: &SchedulerSettings) -> Self {
        Self {
            throttle: settings.throttle(),
            debounce: settings.debounce(),
            pending_capacity: settings.pending_capacity.max(1),
        }
    }
}
