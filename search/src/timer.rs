//! Wall-clock countdown checked between search steps.

use std::time::{Duration, Instant};

/// Counts down from a fixed limit; an absent limit never expires.
#[derive(Debug, Clone, Copy)]
pub struct CountdownTimer {
    start: Instant,
    max_time: Option<Duration>,
}

impl CountdownTimer {
    #[must_use]
    pub fn new(max_time: Option<Duration>) -> Self {
        Self {
            start: Instant::now(),
            max_time,
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// True once the elapsed time reaches the limit. A zero limit is expired
    /// from the start.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.max_time
            .is_some_and(|max_time| self.elapsed() >= max_time)
    }

    /// Time left before expiry; `None` for an unlimited timer.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.max_time
            .map(|max_time| max_time.saturating_sub(self.elapsed()))
    }
}
