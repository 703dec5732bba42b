//! Session configuration.
//!
//! The menu lets a player pick:
//! - `GridSize`: 4x4 (16 cards) or 6x6 (36 cards)
//! - A time limit between 10 and 300 seconds, in steps of 10
//!
//! Timing constants for turn resolution, the status tick and the game-over
//! screen live here as well so hosts can tune them from a settings file.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Default time limit offered by the menu.
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 60;
/// Shortest allowed time limit.
pub const MIN_TIME_LIMIT_SECS: u32 = 10;
/// Longest allowed time limit.
pub const MAX_TIME_LIMIT_SECS: u32 = 300;
/// Increment used by the time setup screen.
pub const TIME_ADJUST_STEP_SECS: u32 = 10;

/// How long two revealed cards stay face up before the turn resolves.
pub const DEFAULT_REVEAL_DELAY_MS: u64 = 500;
/// Period of the status tick.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;
/// How long the game-over screen shows before returning to the menu.
pub const DEFAULT_GAME_OVER_DELAY_MS: u64 = 2000;

/// Board size offered by the menu.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridSize {
    /// 4x4 board, 16 cards.
    #[default]
    #[serde(rename = "4x4")]
    Small,
    /// 6x6 board, 36 cards.
    #[serde(rename = "6x6")]
    Large,
}

impl GridSize {
    /// Cards per row and per column.
    #[must_use]
    pub const fn side(self) -> usize {
        match self {
            GridSize::Small => 4,
            GridSize::Large => 6,
        }
    }

    /// Total number of cards on the board.
    #[must_use]
    pub const fn card_count(self) -> usize {
        self.side() * self.side()
    }

    /// Number of pairs to find.
    #[must_use]
    pub const fn pair_count(self) -> usize {
        self.card_count() / 2
    }
}

impl std::fmt::Display for GridSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.side(), self.side())
    }
}

/// One press of the time setup screen's increase or decrease control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeStep {
    /// Up to the next multiple of the step.
    Increase,
    /// Down to the previous multiple of the step.
    Decrease,
}

/// Settings for a play session.
///
/// Every field has a default, so a settings file only needs to name the
/// values it changes:
///
/// ```
/// use tone_match::core::{GridSize, SessionSettings};
///
/// let settings = SessionSettings::from_toml_str(r#"
///     grid = "6x6"
///     time_limit_secs = 120
/// "#).unwrap();
///
/// assert_eq!(settings.grid, GridSize::Large);
/// assert_eq!(settings.time_limit_secs, 120);
/// assert_eq!(settings.reveal_delay_ms, 500);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Board size.
    pub grid: GridSize,

    /// Countdown length in seconds.
    pub time_limit_secs: u32,

    /// Delay between the second flip of a turn and its resolution.
    pub reveal_delay_ms: u64,

    /// Status tick period.
    pub tick_interval_ms: u64,

    /// Game-over screen duration.
    pub game_over_delay_ms: u64,

    /// Fixed seed for reproducible decks. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            grid: GridSize::default(),
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            reveal_delay_ms: DEFAULT_REVEAL_DELAY_MS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            game_over_delay_ms: DEFAULT_GAME_OVER_DELAY_MS,
            seed: None,
        }
    }
}

impl SessionSettings {
    /// Create settings with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate settings from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Set the board size.
    #[must_use]
    pub fn with_grid(mut self, grid: GridSize) -> Self {
        self.grid = grid;
        self
    }

    /// Set the time limit, rounded to the nearest step and clamped to the
    /// allowed range.
    #[must_use]
    pub fn with_time_limit(mut self, secs: u32) -> Self {
        let step = TIME_ADJUST_STEP_SECS;
        let rounded = secs.saturating_add(step / 2) / step * step;
        self.time_limit_secs = rounded.clamp(MIN_TIME_LIMIT_SECS, MAX_TIME_LIMIT_SECS);
        self
    }

    /// Set the reveal delay.
    #[must_use]
    pub fn with_reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay_ms = millis(delay);
        self
    }

    /// Set the tick period.
    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval_ms = millis(interval);
        self
    }

    /// Set the game-over screen duration.
    #[must_use]
    pub fn with_game_over_delay(mut self, delay: Duration) -> Self {
        self.game_over_delay_ms = millis(delay);
        self
    }

    /// Use a fixed seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Move the time limit one step, clamped to the allowed range.
    ///
    /// A limit that is off the step grid moves to the neighbouring
    /// multiple in the given direction. Returns the new limit.
    pub fn step_time_limit(&mut self, step: TimeStep) -> u32 {
        let size = TIME_ADJUST_STEP_SECS;
        let floor = self.time_limit_secs / size * size;
        let next = match step {
            TimeStep::Increase => floor.saturating_add(size),
            TimeStep::Decrease if floor == self.time_limit_secs => floor.saturating_sub(size),
            TimeStep::Decrease => floor,
        };
        self.time_limit_secs = next.clamp(MIN_TIME_LIMIT_SECS, MAX_TIME_LIMIT_SECS);
        self.time_limit_secs
    }

    /// Check every field against the allowed ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_TIME_LIMIT_SECS..=MAX_TIME_LIMIT_SECS).contains(&self.time_limit_secs) {
            return Err(ConfigError::TimeLimitOutOfRange(self.time_limit_secs));
        }
        if self.time_limit_secs % TIME_ADJUST_STEP_SECS != 0 {
            return Err(ConfigError::TimeLimitOffStep(self.time_limit_secs));
        }
        if self.reveal_delay_ms == 0 {
            return Err(ConfigError::ZeroInterval("reveal_delay_ms"));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("tick_interval_ms"));
        }
        if self.game_over_delay_ms == 0 {
            return Err(ConfigError::ZeroInterval("game_over_delay_ms"));
        }
        Ok(())
    }

    /// Time limit as a duration.
    #[must_use]
    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(u64::from(self.time_limit_secs))
    }

    #[must_use]
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    #[must_use]
    pub fn game_over_delay(&self) -> Duration {
        Duration::from_millis(self.game_over_delay_ms)
    }
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
