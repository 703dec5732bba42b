//! Core engine types: RNG, settings, clock, configuration errors.
//!
//! These are the building blocks shared by the board and the session
//! controller. None of them know about cards or scenes.

pub mod rng;
pub mod config;
pub mod clock;
pub mod error;

pub use rng::{GameRng, GameRngState};
pub use config::{
    GridSize, SessionSettings, TimeStep, DEFAULT_GAME_OVER_DELAY_MS, DEFAULT_REVEAL_DELAY_MS,
    DEFAULT_TICK_INTERVAL_MS, DEFAULT_TIME_LIMIT_SECS, MAX_TIME_LIMIT_SECS,
    MIN_TIME_LIMIT_SECS, TIME_ADJUST_STEP_SECS,
};
pub use clock::SessionClock;
pub use error::ConfigError;
