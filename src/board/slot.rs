//! Per-slot visibility and the display view handed to renderers.

use serde::{Deserialize, Serialize};

use crate::cards::Tone;

/// Visibility of one card on the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotState {
    /// Face down.
    #[default]
    Hidden,
    /// Face up as part of the pending selection.
    Revealed,
    /// Paired and out of play.
    Matched,
}

impl SlotState {
    /// Whether a renderer should show the card's token.
    #[must_use]
    pub fn is_face_up(self) -> bool {
        !matches!(self, SlotState::Hidden)
    }
}

/// What a renderer needs for one slot: visibility plus the token, which is
/// only present when the card is face up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotView {
    pub index: usize,
    pub state: SlotState,
    pub tone: Option<Tone>,
}
