//! Game state machine for one session.
//!
//! ## Turn cycle
//!
//! 1. `flip` reveals up to two hidden slots
//! 2. `check_match` compares the two revealed tokens
//! 3. On a mismatch the caller runs `reset_unmatched` (after its reveal delay)
//!
//! `flip` refuses a third card while two are selected, so the pending
//! selection can never exceed two slots without a separate lock.
//!
//! ## Time
//!
//! The `*_at` methods take an explicit instant; the unsuffixed forms read
//! `Instant::now()`.

use std::time::{Duration, Instant};

use smallvec::SmallVec;

use super::slot::{SlotState, SlotView};
use crate::cards::{Deck, Tone};
use crate::core::{GameRng, SessionClock};

/// Outcome of [`MatchState::check_match`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchResult {
    /// Fewer than two cards selected; nothing to compare yet.
    NotReady,
    /// Tokens were equal. Both slots are now `Matched`.
    Matched,
    /// Tokens differ. Both slots stay `Revealed` until `reset_unmatched`.
    Mismatched,
}

impl MatchResult {
    /// Three-way view: `None` when not ready, else whether the pair matched.
    #[must_use]
    pub fn as_option(self) -> Option<bool> {
        match self {
            MatchResult::NotReady => None,
            MatchResult::Matched => Some(true),
            MatchResult::Mismatched => Some(false),
        }
    }
}

/// Board, selection, tally and clock for one session.
#[derive(Clone, Debug)]
pub struct MatchState {
    deck: Deck,
    slots: Vec<SlotState>,
    selected: SmallVec<[usize; 2]>,
    matches: usize,
    clock: SessionClock,
}

impl MatchState {
    /// Deal a fresh shuffled board and start the clock at `now`.
    ///
    /// Returns `None` when `card_count` is zero or odd.
    pub fn new(card_count: usize, time_limit: Duration, now: Instant, rng: &mut GameRng) -> Option<Self> {
        let deck = Deck::generate(card_count, rng)?;
        Some(Self::with_deck(deck, time_limit, now))
    }

    /// Start a session over an existing deck.
    #[must_use]
    pub fn with_deck(deck: Deck, time_limit: Duration, now: Instant) -> Self {
        Self {
            slots: vec![SlotState::Hidden; deck.len()],
            deck,
            selected: SmallVec::new(),
            matches: 0,
            clock: SessionClock::start(now, time_limit),
        }
    }

    // === Board ===

    #[must_use]
    pub fn card_count(&self) -> usize {
        self.deck.len()
    }

    /// Pairs needed to clear the board.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.deck.len() / 2
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn slot_state(&self, index: usize) -> Option<SlotState> {
        self.slots.get(index).copied()
    }

    #[must_use]
    pub fn slots(&self) -> &[SlotState] {
        &self.slots
    }

    /// Slots in the pending selection, in flip order.
    #[must_use]
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    /// Pairs found so far.
    #[must_use]
    pub fn matches(&self) -> usize {
        self.matches
    }

    /// Display view of one slot. The token is withheld while face down.
    #[must_use]
    pub fn slot_view(&self, index: usize) -> Option<SlotView> {
        let state = self.slot_state(index)?;
        let tone = if state.is_face_up() {
            self.deck.get(index)
        } else {
            None
        };
        Some(SlotView { index, state, tone })
    }

    /// Display views for every slot in order.
    pub fn views(&self) -> impl Iterator<Item = SlotView> + '_ {
        (0..self.slots.len()).filter_map(move |i| self.slot_view(i))
    }

    // === Turn ===

    /// Reveal a hidden slot.
    ///
    /// Returns `false` without changing anything when the index is out of
    /// range, the slot is not hidden, or two slots are already selected.
    pub fn flip(&mut self, index: usize) -> bool {
        if self.selected.len() >= 2 || self.slot_state(index) != Some(SlotState::Hidden) {
            return false;
        }
        self.slots[index] = SlotState::Revealed;
        self.selected.push(index);
        true
    }

    /// Token under a slot that was just flipped, for tone playback.
    #[must_use]
    pub fn revealed_tone(&self, index: usize) -> Option<Tone> {
        match self.slot_state(index)? {
            SlotState::Hidden => None,
            _ => self.deck.get(index),
        }
    }

    /// Compare the two selected slots.
    pub fn check_match(&mut self) -> MatchResult {
        let [first, second] = match self.selected.as_slice() {
            &[a, b] => [a, b],
            _ => return MatchResult::NotReady,
        };

        if self.deck.get(first) != self.deck.get(second) {
            return MatchResult::Mismatched;
        }

        self.slots[first] = SlotState::Matched;
        self.slots[second] = SlotState::Matched;
        self.matches += 1;
        self.selected.clear();
        MatchResult::Matched
    }

    /// Turn every selected slot face down again and clear the selection.
    pub fn reset_unmatched(&mut self) {
        for &index in &self.selected {
            if self.slots[index] == SlotState::Revealed {
                self.slots[index] = SlotState::Hidden;
            }
        }
        self.selected.clear();
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.matches * 2 == self.deck.len()
    }

    // === Clock ===

    #[must_use]
    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    #[must_use]
    pub fn time_limit(&self) -> Duration {
        self.clock.time_limit()
    }

    #[must_use]
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        self.clock.elapsed_at(now)
    }

    #[must_use]
    pub fn time_left_at(&self, now: Instant) -> Duration {
        self.clock.time_left_at(now)
    }

    #[must_use]
    pub fn is_time_up_at(&self, now: Instant) -> bool {
        self.clock.is_time_up_at(now)
    }

    /// Pause or resume. Returns `true` if now paused.
    pub fn toggle_pause_at(&mut self, now: Instant) -> bool {
        self.clock.toggle_pause_at(now)
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_at(Instant::now()).as_secs_f64()
    }

    #[must_use]
    pub fn time_left_seconds(&self) -> f64 {
        self.time_left_at(Instant::now()).as_secs_f64()
    }

    #[must_use]
    pub fn is_time_up(&self) -> bool {
        self.is_time_up_at(Instant::now())
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.toggle_pause_at(Instant::now())
    }
}
