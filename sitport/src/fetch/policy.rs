//! Retry budget and backoff schedule.

use crate::config::{
    DEFAULT_BACKOFF_CEILING_SECS, DEFAULT_BACKOFF_FLOOR_SECS, DEFAULT_BACKOFF_STEP_SECS,
    DEFAULT_MAX_ATTEMPTS, MIN_BACKOFF_FLOOR_SECS,
};
use std::time::Duration;

/// Linear backoff: attempt `n` waits `step * n`, clamped to `[floor, ceiling]`.
///
/// With the defaults (2s step, 2s floor, 60s ceiling) the schedule is
/// 2s, 4s, 6s, 8s, ... The delay never decreases as `n` grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    step: Duration,
    floor: Duration,
    ceiling: Duration,
}

impl BackoffPolicy {
    /// Creates a policy.
    ///
    /// The floor is raised to at least [`MIN_BACKOFF_FLOOR_SECS`] and a
    /// ceiling below the floor is raised to the floor.
    pub fn new(step: Duration, floor: Duration, ceiling: Duration) -> Self {
        let floor = floor.max(Duration::from_secs(MIN_BACKOFF_FLOOR_SECS));
        Self {
            step,
            floor,
            ceiling: ceiling.max(floor),
        }
    }

    /// Delay to wait after the given failed attempt (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.step
            .saturating_mul(attempt.max(1))
            .clamp(self.floor, self.ceiling)
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn floor(&self) -> Duration {
        self.floor
    }

    pub fn ceiling(&self) -> Duration {
        self.ceiling
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(DEFAULT_BACKOFF_STEP_SECS),
            Duration::from_secs(DEFAULT_BACKOFF_FLOOR_SECS),
            Duration::from_secs(DEFAULT_BACKOFF_CEILING_SECS),
        )
    }
}

/// How many attempts a fetch gets and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: BackoffPolicy,
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the attempt budget. At least one attempt is always made.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> &BackoffPolicy {
        &self.backoff
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: BackoffPolicy::default(),
        }
    }
}
