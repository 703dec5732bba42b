//! # tone-match
//!
//! Game core for a memory-matching game where every card hides a musical
//! tone.
//!
//! ## Design Principles
//!
//! 1. **Guarded, not fallible**: Game operations never panic or return
//!    errors. An invalid flip or an early match check is a no-op reported
//!    through its return value.
//!
//! 2. **Explicit time**: The clock and the controller take `Instant`s from
//!    the host, so sessions can be driven by a UI event loop or replayed
//!    in tests.
//!
//! 3. **Deterministic decks**: A seed fixes every shuffle.
//!
//! ## Architecture
//!
//! The host owns a `SessionController`, feeds it `SessionEvent`s and
//! timer polls, and renders the `Notice`s and `SlotView`s it publishes. The
//! controller owns the running `MatchState`, which owns the deck, slots and
//! clock. Rendering and audio synthesis stay outside the crate.
//!
//! ## Modules
//!
//! - `core`: RNG, settings, session clock, configuration errors
//! - `cards`: Tone tokens and deck generation
//! - `board`: Slot visibility and the flip/match state machine
//! - `audio`: Token frequencies and the tone sink boundary
//! - `session`: Scene machine, timers and the session controller

pub mod core;
pub mod cards;
pub mod board;
pub mod audio;
pub mod session;

// Re-export commonly used types
pub use crate::core::{ConfigError, GameRng, GameRngState, GridSize, SessionClock, SessionSettings, TimeStep};

pub use crate::cards::{Deck, Tone, TONE_ALPHABET};

pub use crate::board::{MatchResult, MatchState, SlotState, SlotView};

pub use crate::audio::{frequency_hz, SilentSink, ToneSink};

pub use crate::session::{
    Dispatch, EndReason, Notice, Scene, SessionController, SessionEvent, SessionSummary,
    StatusView, TimerId, TimerKind, TimerQueue,
};
