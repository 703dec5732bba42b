//! Scenes, events and the notices published to the rendering layer.
//!
//! ## Scene graph
//!
//! ```text
//! Menu ──OpenTimeSetup──▶ TimeSetup ──ConfirmTime──▶ Menu
//! Menu ──StartSession──▶ Playing ──(complete | time up)──▶ GameOver
//! Playing ──ReturnToMenu──▶ Menu
//! GameOver ──(DismissGameOver | ReturnToMenu)──▶ Menu
//! ```
//!
//! [`Scene::accepts`] is the single table of which events each scene takes;
//! the controller consults it before applying anything.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{GridSize, TimeStep};

/// Where the session controller currently is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scene {
    /// Choosing board size and time limit.
    Menu,
    /// Adjusting the time limit.
    TimeSetup,
    /// A session is running.
    Playing {
        /// Two cards are face up and waiting for resolution.
        turn_locked: bool,
        /// The clock is stopped and flips are refused.
        paused: bool,
    },
    /// A session ended; the summary stays until dismissed.
    GameOver(SessionSummary),
}

impl Scene {
    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Scene::Menu => "menu",
            Scene::TimeSetup => "time_setup",
            Scene::Playing { .. } => "playing",
            Scene::GameOver(_) => "game_over",
        }
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        matches!(self, Scene::Playing { .. })
    }

    /// Whether `event` is meaningful in this scene.
    ///
    /// Flips are refused while a turn is locked or the game is paused,
    /// independently of the board's own checks.
    #[must_use]
    pub fn accepts(&self, event: &SessionEvent) -> bool {
        use SessionEvent as E;

        match self {
            Scene::Menu => matches!(
                event,
                E::SelectCount(_) | E::OpenTimeSetup | E::StartSession
            ),
            Scene::TimeSetup => matches!(event, E::AdjustTime(_) | E::ConfirmTime),
            Scene::Playing { turn_locked, paused } => match event {
                E::Flip(_) => !turn_locked && !paused,
                E::ResolveTurn => *turn_locked,
                E::Tick | E::Pause => !paused,
                E::Resume => *paused,
                E::Timeout | E::ReturnToMenu => true,
                _ => false,
            },
            Scene::GameOver(_) => matches!(event, E::DismissGameOver | E::ReturnToMenu),
        }
    }
}

/// Input to the session controller, from the host or from a timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Pick the board size on the menu.
    SelectCount(GridSize),
    /// Open the time setup screen.
    OpenTimeSetup,
    /// Move the time limit one step up or down.
    AdjustTime(TimeStep),
    /// Leave time setup and return to the menu.
    ConfirmTime,
    /// Deal a board and start the clock.
    StartSession,
    /// Try to turn over a card.
    Flip(usize),
    /// Resolve the two face-up cards.
    ResolveTurn,
    /// Periodic status refresh.
    Tick,
    Pause,
    Resume,
    /// End the session as timed out.
    Timeout,
    /// Abandon the session (or leave the game-over screen).
    ReturnToMenu,
    /// Game-over screen delay elapsed.
    DismissGameOver,
}

/// Result of handing an event to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// The event changed state.
    Applied,
    /// The event was not valid in the current scene; nothing changed.
    Ignored,
}

impl Dispatch {
    #[must_use]
    pub fn is_applied(self) -> bool {
        matches!(self, Dispatch::Applied)
    }
}

/// Why a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    /// Every pair was found.
    Completed,
    /// The countdown reached zero.
    TimeUp,
}

/// Final figures of a finished session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub reason: EndReason,
    pub grid: GridSize,
    /// Pairs found.
    pub matches: usize,
    /// Pairs on the board.
    pub pairs: usize,
    /// Running time, excluding pauses.
    pub elapsed: Duration,
    /// Seed the deck was shuffled with.
    pub seed: u64,
}

/// Score and countdown for the status line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusView {
    pub score: usize,
    pub pairs: usize,
    pub time_left: Duration,
    pub paused: bool,
}

impl std::fmt::Display for StatusView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "score {}/{}  time left {:.1}s",
            self.score,
            self.pairs,
            self.time_left.as_secs_f64()
        )
    }
}

/// Something the rendering layer should react to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    SceneChanged(Scene),
    SettingsChanged { grid: GridSize, time_limit_secs: u32 },
    /// One or more slots changed visibility.
    BoardChanged,
    TurnResolved { matched: bool },
    StatusChanged(StatusView),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing(turn_locked: bool, paused: bool) -> Scene {
        Scene::Playing { turn_locked, paused }
    }

    #[test]
    fn test_menu_accepts() {
        assert!(Scene::Menu.accepts(&SessionEvent::StartSession));
        assert!(Scene::Menu.accepts(&SessionEvent::SelectCount(GridSize::Large)));
        assert!(!Scene::Menu.accepts(&SessionEvent::Flip(0)));
        assert!(!Scene::Menu.accepts(&SessionEvent::Tick));
    }

    #[test]
    fn test_time_setup_accepts() {
        assert!(Scene::TimeSetup.accepts(&SessionEvent::AdjustTime(TimeStep::Decrease)));
        assert!(Scene::TimeSetup.accepts(&SessionEvent::ConfirmTime));
        assert!(!Scene::TimeSetup.accepts(&SessionEvent::StartSession));
    }

    #[test]
    fn test_playing_flip_gating() {
        assert!(playing(false, false).accepts(&SessionEvent::Flip(3)));
        assert!(!playing(true, false).accepts(&SessionEvent::Flip(3)));
        assert!(!playing(false, true).accepts(&SessionEvent::Flip(3)));
    }

    #[test]
    fn test_playing_pause_gating() {
        assert!(playing(false, false).accepts(&SessionEvent::Pause));
        assert!(!playing(false, false).accepts(&SessionEvent::Resume));
        assert!(playing(false, true).accepts(&SessionEvent::Resume));
        assert!(!playing(false, true).accepts(&SessionEvent::Tick));
        assert!(playing(true, true).accepts(&SessionEvent::ResolveTurn));
        assert!(!playing(false, false).accepts(&SessionEvent::ResolveTurn));
    }

    #[test]
    fn test_game_over_accepts() {
        let summary = SessionSummary {
            reason: EndReason::TimeUp,
            grid: GridSize::Small,
            matches: 2,
            pairs: 8,
            elapsed: Duration::from_secs(60),
            seed: 0,
        };
        let scene = Scene::GameOver(summary);
        assert!(scene.accepts(&SessionEvent::DismissGameOver));
        assert!(scene.accepts(&SessionEvent::ReturnToMenu));
        assert!(!scene.accepts(&SessionEvent::StartSession));
        assert_eq!(scene.name(), "game_over");
    }

    #[test]
    fn test_status_display() {
        let status = StatusView {
            score: 3,
            pairs: 8,
            time_left: Duration::from_millis(41_300),
            paused: false,
        };
        assert_eq!(status.to_string(), "score 3/8  time left 41.3s");
    }
}
