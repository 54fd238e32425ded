//! Active-time accumulator.
//!
//! Converts clock samples into the time a countdown has actually been
//! running. While paused there is no running reference, so however long the
//! pause lasts it contributes nothing.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct ElapsedAccumulator {
    total: Duration,
    accumulated: Duration,
    /// Instant the current running span is measured from, rebased so that
    /// `now - started_at` already includes `accumulated`.
    started_at: Option<Instant>,
}

impl ElapsedAccumulator {
    pub fn new(total: Duration) -> Self {
        Self {
            total,
            accumulated: Duration::ZERO,
            started_at: None,
        }
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    /// Elapsed time frozen at the last pause (or zero / total).
    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Start or resume a running span, continuing from the accumulated value.
    pub fn begin(&mut self, now: Instant) {
        let started_at = now.checked_sub(self.accumulated).unwrap_or(now);
        self.started_at = Some(started_at);
    }

    /// Active elapsed time at `now`, never more than the total.
    pub fn sample(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(started_at) => now.saturating_duration_since(started_at).min(self.total),
            None => self.accumulated,
        }
    }

    /// Stop counting. Returns the frozen elapsed value.
    pub fn freeze(&mut self, now: Instant) -> Duration {
        self.accumulated = self.sample(now);
        self.started_at = None;
        self.accumulated
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        self.started_at = None;
    }

    /// Pin the accumulated value to the total.
    pub fn complete(&mut self) {
        self.accumulated = self.total;
        self.started_at = None;
    }
}
