//! Deferred actions for the session controller.
//!
//! The controller never blocks. Anything that should happen later (turn
//! resolution, the status tick, leaving the game-over screen) is scheduled
//! here and fired when the host calls `SessionController::advance`.
//!
//! Entries fire in deadline order; ties fire in scheduling order. A
//! repeating entry stays on its period grid: when the host polls late, the
//! missed periods collapse into one firing at the latest grid point not
//! after the poll, and the entry is re-armed one period later.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Unique identifier for a scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u64);

impl TimerId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Timer({})", self.0)
    }
}

/// What a timer does when it fires.
///
/// Each kind carries the generation of the session that scheduled it so a
/// timer outliving its session can be recognised and ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// Periodic status refresh and timeout check.
    Tick { session: u64 },
    /// Resolve the two revealed cards.
    ResolveTurn { session: u64 },
    /// Leave the game-over screen.
    DismissGameOver { session: u64 },
}

impl TimerKind {
    /// Generation of the session that scheduled this timer.
    #[must_use]
    pub fn session(self) -> u64 {
        match self {
            TimerKind::Tick { session }
            | TimerKind::ResolveTurn { session }
            | TimerKind::DismissGameOver { session } => session,
        }
    }
}

/// A timer that came due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FiredTimer {
    pub id: TimerId,
    pub kind: TimerKind,
    /// The instant the timer was due, which may be earlier than the poll.
    pub deadline: Instant,
    /// Earlier periods of a repeating timer folded into this firing.
    pub missed: u64,
}

#[derive(Clone, Debug)]
struct TimerEntry {
    id: TimerId,
    deadline: Instant,
    period: Option<Duration>,
    kind: TimerKind,
}

impl TimerEntry {
    /// Latest deadline at or before `now` and the number of periods skipped
    /// to reach it, or `None` if the entry is not due.
    fn due_at(&self, now: Instant) -> Option<(Instant, u64)> {
        if self.deadline > now {
            return None;
        }
        let Some(period) = self.period else {
            return Some((self.deadline, 0));
        };

        let lag = now.duration_since(self.deadline).as_nanos();
        let period_nanos = period.as_nanos();
        let missed = u64::try_from(lag / period_nanos).unwrap_or(u64::MAX);
        let offset = u64::try_from(lag % period_nanos).unwrap_or(u64::MAX);
        Some((now - Duration::from_nanos(offset), missed))
    }
}

/// Pending one-shot and repeating timers.
#[derive(Clone, Debug, Default)]
pub struct TimerQueue {
    entries: Vec<TimerEntry>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of scheduled timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fire `kind` once at `deadline`.
    pub fn schedule_once(&mut self, deadline: Instant, kind: TimerKind) -> TimerId {
        self.push(deadline, None, kind)
    }

    /// Fire `kind` every `period`, first at `first`.
    ///
    /// A zero period is treated as one millisecond so the queue always
    /// makes progress.
    pub fn schedule_repeating(&mut self, first: Instant, period: Duration, kind: TimerKind) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        self.push(first, Some(period), kind)
    }

    fn push(&mut self, deadline: Instant, period: Option<Duration>, kind: TimerKind) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(TimerEntry {
            id,
            deadline,
            period,
            kind,
        });
        id
    }

    /// Cancel a timer. Returns `false` if it already fired or never existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    #[must_use]
    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Earliest pending deadline, for hosts that sleep until the next timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    /// Take the earliest timer due at or before `now`.
    ///
    /// One-shot timers are removed; repeating timers are re-armed on the
    /// first grid point after the one they fired for.
    pub fn pop_due(&mut self, now: Instant) -> Option<FiredTimer> {
        let (pos, deadline, missed) = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.due_at(now).map(|(at, missed)| (i, at, missed, e.id)))
            .min_by_key(|&(_, at, _, id)| (at, id))
            .map(|(i, at, missed, _)| (i, at, missed))?;

        let entry = &mut self.entries[pos];
        let fired = FiredTimer {
            id: entry.id,
            kind: entry.kind,
            deadline,
            missed,
        };

        match entry.period {
            Some(period) => entry.deadline = deadline + period,
            None => {
                self.entries.remove(pos);
            }
        }

        Some(fired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_once_fires_once() {
        let t0 = Instant::now();
        let mut timers = TimerQueue::new();
        let id = timers.schedule_once(t0 + ms(500), TimerKind::ResolveTurn { session: 1 });

        assert!(timers.pop_due(t0 + ms(499)).is_none());

        let fired = timers.pop_due(t0 + ms(600)).unwrap();
        assert_eq!(fired.id, id);
        assert_eq!(fired.deadline, t0 + ms(500));
        assert_eq!(fired.kind, TimerKind::ResolveTurn { session: 1 });

        assert!(timers.pop_due(t0 + ms(10_000)).is_none());
        assert!(timers.is_empty());
    }

    #[test]
    fn test_repeating_on_time() {
        let t0 = Instant::now();
        let mut timers = TimerQueue::new();
        timers.schedule_repeating(t0 + ms(100), ms(100), TimerKind::Tick { session: 1 });

        for n in 1..=3 {
            let fired = timers.pop_due(t0 + ms(100 * n)).unwrap();
            assert_eq!(fired.deadline, t0 + ms(100 * n));
            assert_eq!(fired.missed, 0);
            assert!(timers.pop_due(t0 + ms(100 * n)).is_none());
        }
    }

    #[test]
    fn test_repeating_late_poll_fires_once() {
        let t0 = Instant::now();
        let mut timers = TimerQueue::new();
        timers.schedule_repeating(t0 + ms(100), ms(100), TimerKind::Tick { session: 1 });

        let fired = timers.pop_due(t0 + ms(350)).unwrap();
        assert_eq!(fired.deadline, t0 + ms(300));
        assert_eq!(fired.missed, 2);

        assert!(timers.pop_due(t0 + ms(350)).is_none());
        assert_eq!(timers.next_deadline(), Some(t0 + ms(400)));
    }

    #[test]
    fn test_late_repeating_orders_by_folded_deadline() {
        let t0 = Instant::now();
        let mut timers = TimerQueue::new();
        timers.schedule_repeating(t0 + ms(100), ms(100), TimerKind::Tick { session: 1 });
        timers.schedule_once(t0 + ms(250), TimerKind::ResolveTurn { session: 1 });

        let kinds: Vec<_> = std::iter::from_fn(|| timers.pop_due(t0 + ms(300)))
            .map(|f| (f.kind, f.deadline))
            .collect();

        assert_eq!(
            kinds,
            vec![
                (TimerKind::ResolveTurn { session: 1 }, t0 + ms(250)),
                (TimerKind::Tick { session: 1 }, t0 + ms(300)),
            ]
        );
    }

    #[test]
    fn test_deadline_order() {
        let t0 = Instant::now();
        let mut timers = TimerQueue::new();
        timers.schedule_once(t0 + ms(300), TimerKind::DismissGameOver { session: 1 });
        timers.schedule_once(t0 + ms(100), TimerKind::ResolveTurn { session: 1 });
        timers.schedule_once(t0 + ms(100), TimerKind::Tick { session: 1 });

        let kinds: Vec<_> = std::iter::from_fn(|| timers.pop_due(t0 + ms(1000)))
            .map(|f| f.kind)
            .collect();

        assert_eq!(
            kinds,
            vec![
                TimerKind::ResolveTurn { session: 1 },
                TimerKind::Tick { session: 1 },
                TimerKind::DismissGameOver { session: 1 },
            ]
        );
    }

    #[test]
    fn test_cancel() {
        let t0 = Instant::now();
        let mut timers = TimerQueue::new();
        let id = timers.schedule_repeating(t0, ms(100), TimerKind::Tick { session: 2 });

        assert!(timers.is_scheduled(id));
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert!(timers.pop_due(t0 + ms(1000)).is_none());
    }

    #[test]
    fn test_kind_session() {
        assert_eq!(TimerKind::Tick { session: 4 }.session(), 4);
        assert_eq!(TimerKind::DismissGameOver { session: 9 }.session(), 9);
        assert_eq!(format!("{}", TimerId(3)), "Timer(3)");
    }
}
