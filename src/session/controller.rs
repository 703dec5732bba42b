//! Session controller: scene transitions, turn sequencing, status tick.
//!
//! The controller is a plain value owned by the host. The host feeds it
//! input events through [`SessionController::handle`] and drives time
//! through [`SessionController::advance`], then drains
//! [`Notice`]s to update the display. Every handler runs to completion
//! before the next event, so flips, turn resolution and timeouts only
//! interleave at event boundaries.
//!
//! Event instants never run backwards: a timer polled late is dispatched at
//! its deadline or at the latest instant already handled, whichever is
//! later.
//!
//! ## Turn cycle
//!
//! 1. `Flip(i)` reveals a card and requests its tone
//! 2. On the second card the turn locks and `ResolveTurn` is scheduled
//!    after the reveal delay
//! 3. `ResolveTurn` checks the pair, hides a mismatch, ends the session if
//!    the board is clear, and unlocks the turn
//!
//! ## Timeout
//!
//! When the tick finds the time up while a turn is locked, the pending
//! resolution is applied first and the session then ends. A pair revealed
//! before the deadline therefore still counts. A flip at or after the
//! deadline reveals nothing and ends the session.

use std::time::Instant;

use tracing::{debug, info, trace};

use super::scene::{Dispatch, EndReason, Notice, Scene, SessionEvent, SessionSummary, StatusView};
use super::timers::{TimerId, TimerKind, TimerQueue};
use crate::audio::{frequency_hz, SilentSink, ToneSink};
use crate::board::{MatchResult, MatchState, SlotView};
use crate::core::{GameRng, GridSize, SessionSettings};

/// Owns the settings, the running session and its timers.
pub struct SessionController<S = SilentSink> {
    settings: SessionSettings,
    scene: Scene,
    game: Option<MatchState>,
    /// Grid and deck seed of the running session.
    session_grid: GridSize,
    session_seed: u64,
    /// Bumped on every session start and teardown.
    generation: u64,
    /// Latest instant passed to `handle`.
    latest: Option<Instant>,
    timers: TimerQueue,
    ticker: Option<TimerId>,
    pending_resolve: Option<TimerId>,
    rng: GameRng,
    sink: S,
    notices: Vec<Notice>,
}

impl SessionController<SilentSink> {
    /// Create a controller without audio output.
    pub fn new(settings: SessionSettings) -> Self {
        Self::with_sink(settings, SilentSink)
    }
}

impl<S: ToneSink> SessionController<S> {
    /// Create a controller that sends tone requests to `sink`.
    pub fn with_sink(settings: SessionSettings, sink: S) -> Self {
        let rng = match settings.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        Self {
            session_grid: settings.grid,
            settings,
            scene: Scene::Menu,
            game: None,
            session_seed: 0,
            generation: 0,
            latest: None,
            timers: TimerQueue::new(),
            ticker: None,
            pending_resolve: None,
            rng,
            sink,
            notices: Vec::new(),
        }
    }

    // === Queries ===

    #[must_use]
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The running session, if any.
    #[must_use]
    pub fn game(&self) -> Option<&MatchState> {
        self.game.as_ref()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Per-slot display views; empty outside a session.
    #[must_use]
    pub fn board_views(&self) -> Vec<SlotView> {
        self.game
            .as_ref()
            .map(|g| g.views().collect())
            .unwrap_or_default()
    }

    /// Score and countdown at `now`, if a session is running.
    #[must_use]
    pub fn status_at(&self, now: Instant) -> Option<StatusView> {
        self.game.as_ref().map(|g| StatusView {
            score: g.matches(),
            pairs: g.pair_count(),
            time_left: g.time_left_at(now),
            paused: g.is_paused(),
        })
    }

    /// When the host should call `advance` next.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Number of pending timers.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Take every notice published since the last call.
    ///
    /// Hosts should drain once per frame. Only the newest `StatusChanged`
    /// is kept between drains, so an undrained queue grows with input
    /// events but not with ticks.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    // === Dispatch ===

    /// Apply one event at `now`.
    ///
    /// Events the current scene does not accept are ignored without any
    /// state change.
    pub fn handle(&mut self, event: SessionEvent, now: Instant) -> Dispatch {
        self.latest = Some(self.latest.map_or(now, |seen| seen.max(now)));

        if !self.scene.accepts(&event) {
            trace!(?event, scene = self.scene.name(), "event ignored");
            return Dispatch::Ignored;
        }

        match event {
            SessionEvent::SelectCount(grid) => {
                self.settings.grid = grid;
                self.publish_settings();
                Dispatch::Applied
            }
            SessionEvent::OpenTimeSetup => {
                self.set_scene(Scene::TimeSetup);
                Dispatch::Applied
            }
            SessionEvent::AdjustTime(step) => {
                self.settings.step_time_limit(step);
                self.publish_settings();
                Dispatch::Applied
            }
            SessionEvent::ConfirmTime => {
                self.set_scene(Scene::Menu);
                Dispatch::Applied
            }
            SessionEvent::StartSession => self.start_session(now),
            SessionEvent::Flip(index) => self.flip(index, now),
            SessionEvent::ResolveTurn => {
                self.resolve_turn(now);
                Dispatch::Applied
            }
            SessionEvent::Tick => self.tick(now),
            SessionEvent::Pause | SessionEvent::Resume => self.toggle_pause(now),
            SessionEvent::Timeout => {
                self.time_out(now);
                Dispatch::Applied
            }
            SessionEvent::ReturnToMenu | SessionEvent::DismissGameOver => {
                self.teardown();
                self.set_scene(Scene::Menu);
                Dispatch::Applied
            }
        }
    }

    /// Fire every timer due at or before `now`, each at its own deadline
    /// (or at the latest handled instant, if that is later).
    ///
    /// Returns how many timers fired, including stale ones that were
    /// dropped because their session is gone.
    pub fn advance(&mut self, now: Instant) -> usize {
        let mut fired = 0;

        while let Some(timer) = self.timers.pop_due(now) {
            fired += 1;

            if timer.kind.session() != self.generation {
                trace!(id = %timer.id, "stale timer dropped");
                continue;
            }

            if timer.missed > 0 {
                trace!(id = %timer.id, missed = timer.missed, "late poll");
            }

            let event = match timer.kind {
                TimerKind::Tick { .. } => SessionEvent::Tick,
                TimerKind::ResolveTurn { .. } => SessionEvent::ResolveTurn,
                TimerKind::DismissGameOver { .. } => SessionEvent::DismissGameOver,
            };
            let at = self.latest.map_or(timer.deadline, |seen| seen.max(timer.deadline));
            self.handle(event, at);
        }

        fired
    }

    // === Handlers ===

    fn start_session(&mut self, now: Instant) -> Dispatch {
        let seed = self.rng.next_seed();
        let mut deck_rng = GameRng::new(seed);
        let grid = self.settings.grid;

        let Some(game) = MatchState::new(grid.card_count(), self.settings.time_limit(), now, &mut deck_rng) else {
            return Dispatch::Ignored;
        };

        self.teardown();
        self.game = Some(game);
        self.session_grid = grid;
        self.session_seed = seed;

        let period = self.settings.tick_interval();
        self.ticker = Some(self.timers.schedule_repeating(
            now + period,
            period,
            TimerKind::Tick {
                session: self.generation,
            },
        ));

        info!(
            %grid,
            time_limit_secs = self.settings.time_limit_secs,
            seed,
            session = self.generation,
            "session started"
        );

        self.set_playing(false, false);
        self.notices.push(Notice::BoardChanged);
        self.publish_status(now);
        Dispatch::Applied
    }

    fn flip(&mut self, index: usize, now: Instant) -> Dispatch {
        let Some(game) = self.game.as_mut() else {
            return Dispatch::Ignored;
        };
        if game.is_time_up_at(now) {
            debug!(index, "flip after deadline");
            self.time_out(now);
            return Dispatch::Ignored;
        }
        if !game.flip(index) {
            trace!(index, "flip rejected");
            return Dispatch::Ignored;
        }

        if let Some(tone) = game.revealed_tone(index) {
            self.sink.play_tone(frequency_hz(tone));
        }
        let selected = game.selected().len();
        self.notices.push(Notice::BoardChanged);

        if selected == 2 {
            self.pending_resolve = Some(self.timers.schedule_once(
                now + self.settings.reveal_delay(),
                TimerKind::ResolveTurn {
                    session: self.generation,
                },
            ));
            self.set_playing(true, false);
        }

        Dispatch::Applied
    }

    /// Resolve the locked turn. Returns `true` if the session ended.
    fn resolve_turn(&mut self, now: Instant) -> bool {
        if let Some(id) = self.pending_resolve.take() {
            self.timers.cancel(id);
        }
        let Some(game) = self.game.as_mut() else {
            return false;
        };

        let result = game.check_match();
        if result == MatchResult::Mismatched {
            game.reset_unmatched();
        }
        let complete = game.is_complete();
        let paused = game.is_paused();

        debug!(?result, matches = game.matches(), "turn resolved");
        if let Some(matched) = result.as_option() {
            self.notices.push(Notice::TurnResolved { matched });
        }
        self.notices.push(Notice::BoardChanged);

        if complete {
            self.end_session(EndReason::Completed, now);
            return true;
        }

        self.set_playing(false, paused);
        false
    }

    fn tick(&mut self, now: Instant) -> Dispatch {
        let Some(game) = self.game.as_ref() else {
            return Dispatch::Ignored;
        };
        let time_up = game.is_time_up_at(now);

        self.publish_status(now);
        if time_up {
            self.time_out(now);
        }
        Dispatch::Applied
    }

    fn toggle_pause(&mut self, now: Instant) -> Dispatch {
        let Some(game) = self.game.as_mut() else {
            return Dispatch::Ignored;
        };
        let paused = game.toggle_pause_at(now);
        debug!(paused, "pause toggled");

        let turn_locked = matches!(self.scene, Scene::Playing { turn_locked: true, .. });
        self.set_playing(turn_locked, paused);
        self.publish_status(now);
        Dispatch::Applied
    }

    fn time_out(&mut self, now: Instant) {
        if matches!(self.scene, Scene::Playing { turn_locked: true, .. }) && self.resolve_turn(now) {
            return;
        }
        self.end_session(EndReason::TimeUp, now);
    }

    fn end_session(&mut self, reason: EndReason, now: Instant) {
        let Some(game) = self.game.take() else {
            return;
        };
        self.cancel_session_timers();

        let summary = SessionSummary {
            reason,
            grid: self.session_grid,
            matches: game.matches(),
            pairs: game.pair_count(),
            elapsed: game.elapsed_at(now).min(game.time_limit()),
            seed: self.session_seed,
        };

        info!(
            ?reason,
            matches = summary.matches,
            pairs = summary.pairs,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            session = self.generation,
            "session ended"
        );

        self.timers.schedule_once(
            now + self.settings.game_over_delay(),
            TimerKind::DismissGameOver {
                session: self.generation,
            },
        );
        self.set_scene(Scene::GameOver(summary));
    }

    /// Drop the running session, if any, and every pending timer.
    fn teardown(&mut self) {
        if self.game.take().is_some() {
            debug!(session = self.generation, "session abandoned");
        }
        self.cancel_session_timers();
        self.timers.clear();
        self.generation += 1;
    }

    fn cancel_session_timers(&mut self) {
        if let Some(id) = self.ticker.take() {
            self.timers.cancel(id);
        }
        if let Some(id) = self.pending_resolve.take() {
            self.timers.cancel(id);
        }
    }

    // === Notices ===

    fn set_scene(&mut self, scene: Scene) {
        if self.scene != scene {
            debug!(from = self.scene.name(), to = scene.name(), "scene changed");
            self.scene = scene.clone();
            self.notices.push(Notice::SceneChanged(scene));
        }
    }

    fn set_playing(&mut self, turn_locked: bool, paused: bool) {
        self.set_scene(Scene::Playing { turn_locked, paused });
    }

    fn publish_settings(&mut self) {
        self.notices.push(Notice::SettingsChanged {
            grid: self.settings.grid,
            time_limit_secs: self.settings.time_limit_secs,
        });
    }

    fn publish_status(&mut self, now: Instant) {
        if let Some(status) = self.status_at(now) {
            trace!(%status, "status");
            self.notices.retain(|n| !matches!(n, Notice::StatusChanged(_)));
            self.notices.push(Notice::StatusChanged(status));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::board::SlotState;

    /// Sink that records every frequency.
    #[derive(Default)]
    struct RecordingSink(Vec<f64>);

    impl ToneSink for RecordingSink {
        fn play_tone(&mut self, frequency_hz: f64) {
            self.0.push(frequency_hz);
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn started(now: Instant) -> SessionController<RecordingSink> {
        let settings = SessionSettings::new().with_seed(42).with_time_limit(10);
        let mut controller = SessionController::with_sink(settings, RecordingSink::default());
        assert!(controller.handle(SessionEvent::StartSession, now).is_applied());
        controller
    }

    /// Find two slots holding the same token, and two holding different ones.
    fn pair_and_mismatch(controller: &SessionController<RecordingSink>) -> ((usize, usize), (usize, usize)) {
        let deck = controller.game().unwrap().deck();
        let first = deck.get(0).unwrap();
        let twin = (1..deck.len()).find(|&i| deck.get(i) == Some(first)).unwrap();
        let other = (1..deck.len()).find(|&i| deck.get(i) != Some(first)).unwrap();
        ((0, twin), (0, other))
    }

    #[test]
    fn test_flip_requests_tone() {
        let t0 = Instant::now();
        let mut controller = started(t0);

        assert!(controller.handle(SessionEvent::Flip(0), t0).is_applied());
        assert_eq!(controller.sink().0.len(), 1);

        // Rejected flips stay silent.
        assert_eq!(controller.handle(SessionEvent::Flip(0), t0), Dispatch::Ignored);
        assert_eq!(controller.sink().0.len(), 1);
    }

    #[test]
    fn test_turn_locks_until_resolved() {
        let t0 = Instant::now();
        let mut controller = started(t0);
        let (_, (a, b)) = pair_and_mismatch(&controller);

        controller.handle(SessionEvent::Flip(a), t0);
        controller.handle(SessionEvent::Flip(b), t0);
        assert_eq!(controller.scene(), &Scene::Playing { turn_locked: true, paused: false });

        let third = (0..16).find(|&i| i != a && i != b).unwrap();
        assert_eq!(controller.handle(SessionEvent::Flip(third), t0), Dispatch::Ignored);

        controller.advance(t0 + ms(500));
        assert_eq!(controller.scene(), &Scene::Playing { turn_locked: false, paused: false });

        let game = controller.game().unwrap();
        assert_eq!(game.slot_state(a), Some(SlotState::Hidden));
        assert_eq!(game.slot_state(b), Some(SlotState::Hidden));
    }

    #[test]
    fn test_return_to_menu_clears_session() {
        let t0 = Instant::now();
        let mut controller = started(t0);
        let generation = controller.generation();

        controller.handle(SessionEvent::ReturnToMenu, t0);
        assert!(controller.generation() > generation);
        assert_eq!(controller.pending_timers(), 0);
        assert!(controller.game().is_none());
    }
}
