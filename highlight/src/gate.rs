use std::time::{Duration, Instant};

/// Throttle + trailing debounce, as plain state.
///
/// After `arm`, the gate becomes due at the earlier of:
/// - the throttle deadline: immediately if a full throttle interval has passed
///   since the last fire, otherwise `last_fire + throttle`;
/// - the debounce deadline: `last_arm + debounce`, but never before
///   `last_fire + throttle`.
///
/// Firing clears the throttle deadline. A debounce deadline still in the
/// future survives a throttled fire, which gives the trailing run after a
/// burst ends. Fires are always at least one throttle interval apart.
#[derive(Debug, Clone)]
pub struct FlushGate {
    throttle: Duration,
    debounce: Duration,
    last_fire: Option<Instant>,
    throttle_at: Option<Instant>,
    debounce_at: Option<Instant>,
}

impl FlushGate {
    pub fn new(throttle: Duration, debounce: Duration) -> Self {
        Self {
            throttle,
            debounce,
            last_fire: None,
            throttle_at: None,
            debounce_at: None,
        }
    }

    pub fn arm(&mut self, now: Instant) {
        self.debounce_at = Some(self.after_throttle(now + self.debounce));
        if self.throttle_at.is_none() {
            let earliest = self
                .last_fire
                .map_or(now, |last| (last + self.throttle).max(now));
            self.throttle_at = Some(earliest);
        }
    }

    /// Returns true, and records the fire, if a deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let throttle_due = self.throttle_at.is_some_and(|at| at <= now);
        let debounce_due = self.debounce_at.is_some_and(|at| at <= now);
        if !throttle_due && !debounce_due {
            return false;
        }

        self.last_fire = Some(now);
        self.throttle_at = None;
        self.debounce_at = if debounce_due {
            None
        } else {
            self.debounce_at.map(|at| self.after_throttle(at))
        };
        true
    }

    fn after_throttle(&self, at: Instant) -> Instant {
        match self.last_fire {
            Some(last) => at.max(last + self.throttle),
            None => at,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.throttle_at, self.debounce_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn is_armed(&self) -> bool {
        self.throttle_at.is_some() || self.debounce_at.is_some()
    }

    /// Forgets pending deadlines. The last fire time is kept.
    pub fn cancel(&mut self) {
        self.throttle_at = None;
        self.debounce_at = None;
    }

    pub fn last_fire(&self) -> Option<Instant> {
        self.last_fire
    }
}

#[cfg(test)]
mod tests;
