// Pacing policy — fixed pauses between batch calls.
//
// The completion endpoint rate-limits aggressively, so the runner pauses on
// a fixed cadence rather than reacting to 429s. The policy is a trait so
// tests can swap in a no-op (or a counter) and a future implementation can
// key off explicit rate-limit signals instead.

use std::time::Duration;

/// Decides whether to pause after a given batch.
pub trait PacingPolicy: Send + Sync {
    /// Delay to apply after the batch at `batch_index` completes, if any.
    fn delay_after(&self, batch_index: usize) -> Option<Duration>;
}

/// Pause for a fixed duration once every `every` batches.
///
/// The pause fires on batch indexes where `batch_index % every == 0`, so
/// the first batch paces too. Over 250 batches with `every = 100`, the
/// pause fires exactly three times (indexes 0, 100, 200).
#[derive(Debug, Clone)]
pub struct IntervalPacing {
    every: usize,
    delay: Duration,
}

impl IntervalPacing {
    /// An `every` of zero is treated as one (pause after every batch).
    pub fn new(every: usize, delay: Duration) -> Self {
        Self {
            every: every.max(1),
            delay,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl PacingPolicy for IntervalPacing {
    fn delay_after(&self, batch_index: usize) -> Option<Duration> {
        (batch_index % self.every == 0).then_some(self.delay)
    }
}

/// Never pauses. For tests and offline endpoints with no rate limits.
pub struct NoPacing;

impl PacingPolicy for NoPacing {
    fn delay_after(&self, _batch_index: usize) -> Option<Duration> {
        None
    }
}
