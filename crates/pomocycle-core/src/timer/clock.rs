//! Wall-clock delta tracking for tick drivers.

use std::time::{Duration, Instant};

/// Reference driver cadence in milliseconds.
pub const DEFAULT_TICK_MS: u64 = 100;

/// Measures the wall time between successive driver ticks.
///
/// The first call reports zero. Later calls report the time since the
/// previous call, so a driver that reads the clock on every engine call
/// never credits the same interval twice.
#[derive(Debug, Clone, Default)]
pub struct TickClock {
    last: Option<Instant>,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call, using the current instant.
    pub fn elapsed_secs(&mut self) -> f64 {
        self.elapsed_secs_at(Instant::now())
    }

    /// Seconds since the previous call, using `now`.
    pub fn elapsed_secs_at(&mut self, now: Instant) -> f64 {
        let delta = self
            .last
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last = Some(now);
        delta.as_secs_f64()
    }
}
