//! Card tokens and deck generation.
//!
//! - `Tone`: the token hidden under a card
//! - `TONE_ALPHABET`: the fixed set tokens are drawn from
//! - `Deck`: shuffled sequence of paired tokens for one session

pub mod tone;
pub mod deck;

pub use tone::{Tone, TONE_ALPHABET};
pub use deck::Deck;
