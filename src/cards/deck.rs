//! Deck generation.
//!
//! A deck is the ordered sequence of tokens under the board's slots. It is
//! built once per session: `card_count / 2` tokens are taken from the
//! alphabet (cycling by index if the alphabet runs out), each is pushed
//! twice, and the whole sequence gets a Fisher–Yates shuffle.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::tone::{Tone, TONE_ALPHABET};
use crate::core::GameRng;

/// Shuffled sequence of paired tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    tokens: Vec<Tone>,
}

impl Deck {
    /// Build a shuffled deck of `card_count` cards from [`TONE_ALPHABET`].
    ///
    /// Returns `None` when `card_count` is zero or odd.
    ///
    /// ```
    /// use tone_match::cards::Deck;
    /// use tone_match::core::GameRng;
    ///
    /// let mut rng = GameRng::new(42);
    /// let deck = Deck::generate(16, &mut rng).unwrap();
    /// assert_eq!(deck.len(), 16);
    ///
    /// assert!(Deck::generate(15, &mut rng).is_none());
    /// ```
    pub fn generate(card_count: usize, rng: &mut GameRng) -> Option<Self> {
        Self::generate_from(card_count, &TONE_ALPHABET, rng)
    }

    /// Build a shuffled deck drawing tokens from `alphabet`.
    ///
    /// When more pairs are needed than the alphabet holds, tokens are reused
    /// in alphabet order, so some tokens then occur four or more times.
    /// Returns `None` for a zero or odd card count or an empty alphabet.
    pub fn generate_from(card_count: usize, alphabet: &[Tone], rng: &mut GameRng) -> Option<Self> {
        if card_count == 0 || card_count % 2 != 0 || alphabet.is_empty() {
            return None;
        }

        let mut tokens = Vec::with_capacity(card_count);
        for i in 0..card_count / 2 {
            let tone = alphabet[i % alphabet.len()];
            tokens.push(tone);
            tokens.push(tone);
        }

        shuffle(&mut tokens, rng);

        Some(Self { tokens })
    }

    /// Use a fixed layout instead of a shuffled one (replays, tests).
    ///
    /// Returns `None` when the layout is empty or has an odd length.
    pub fn from_tokens(tokens: Vec<Tone>) -> Option<Self> {
        if tokens.is_empty() || tokens.len() % 2 != 0 {
            return None;
        }
        Some(Self { tokens })
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at a slot, if in range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Tone> {
        self.tokens.get(index).copied()
    }

    /// All tokens in slot order.
    #[must_use]
    pub fn tokens(&self) -> &[Tone] {
        &self.tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = Tone> + '_ {
        self.tokens.iter().copied()
    }

    /// How many times each token occurs.
    #[must_use]
    pub fn occurrences(&self) -> FxHashMap<Tone, usize> {
        let mut counts = FxHashMap::default();
        for &tone in &self.tokens {
            *counts.entry(tone).or_insert(0) += 1;
        }
        counts
    }
}

/// Fisher–Yates: for `i` from the last index down to 1, swap `i` with a
/// uniform index in `0..=i`.
fn shuffle<T>(items: &mut [T], rng: &mut GameRng) {
    for i in (1..items.len()).rev() {
        let j = rng.index_upto(i);
        items.swap(i, j);
    }
}
