//! Board state: slot visibility, pending selection, match tally, clock.
//!
//! `MatchState` is the only owner of a session's deck and slots. Callers
//! change it exclusively through its operations (`flip`, `check_match`,
//! `reset_unmatched`, `toggle_pause_at`), each of which is a guarded no-op
//! when its preconditions do not hold.

mod slot;
mod state;

pub use slot::{SlotState, SlotView};
pub use state::{MatchResult, MatchState};
