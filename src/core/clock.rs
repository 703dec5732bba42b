//! Pause-aware session clock.
//!
//! Elapsed time excludes every pause interval: while paused the reading is
//! frozen at the pause instant, and on resume the pause length is added to
//! the accumulated paused time.
//!
//! All readings take an explicit `now` so the clock can be driven by the
//! host's event loop (or a test) instead of the wall clock.

use std::time::{Duration, Instant};

/// Countdown clock for one session.
#[derive(Clone, Debug)]
pub struct SessionClock {
    started_at: Instant,
    paused_total: Duration,
    paused_at: Option<Instant>,
    time_limit: Duration,
}

impl SessionClock {
    /// Start a clock at `now` with the given limit.
    #[must_use]
    pub fn start(now: Instant, time_limit: Duration) -> Self {
        Self {
            started_at: now,
            paused_total: Duration::ZERO,
            paused_at: None,
            time_limit,
        }
    }

    #[must_use]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Total time spent paused, not counting a pause still in progress.
    #[must_use]
    pub fn paused_total(&self) -> Duration {
        self.paused_total
    }

    /// Running time at `now`, frozen while paused.
    ///
    /// Instants earlier than the start (or the pause) read as zero progress.
    #[must_use]
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        let reading = self.paused_at.unwrap_or(now);
        reading
            .saturating_duration_since(self.started_at)
            .saturating_sub(self.paused_total)
    }

    /// Remaining time at `now`, never negative.
    #[must_use]
    pub fn time_left_at(&self, now: Instant) -> Duration {
        self.time_limit.saturating_sub(self.elapsed_at(now))
    }

    #[must_use]
    pub fn is_time_up_at(&self, now: Instant) -> bool {
        self.time_left_at(now).is_zero()
    }

    /// Flip between running and paused. Returns `true` if now paused.
    pub fn toggle_pause_at(&mut self, now: Instant) -> bool {
        match self.paused_at.take() {
            Some(paused_at) => {
                self.paused_total += now.saturating_duration_since(paused_at);
                false
            }
            None => {
                self.paused_at = Some(now);
                true
            }
        }
    }
}
