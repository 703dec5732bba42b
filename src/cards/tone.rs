//! Card tokens.
//!
//! Every card hides a musical tone. Two cards match iff their tones are
//! equal; the tone has no identity beyond that comparison. A tone is stored
//! as its MIDI note number, which also drives the frequency table in
//! `crate::audio`.

use serde::{Deserialize, Serialize};

/// A card token: one pitch, identified by its MIDI note number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tone(pub u8);

const PITCH_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

impl Tone {
    /// Middle C.
    pub const C4: Tone = Tone(60);
    /// Concert A.
    pub const A4: Tone = Tone(69);

    /// Create a tone from a MIDI note number.
    #[must_use]
    pub const fn new(note: u8) -> Self {
        Self(note)
    }

    /// Get the MIDI note number.
    #[must_use]
    pub const fn note(self) -> u8 {
        self.0
    }

    /// Pitch class name without octave ("C", "F#", ...).
    #[must_use]
    pub fn pitch_name(self) -> &'static str {
        PITCH_NAMES[usize::from(self.0 % 12)]
    }

    /// Scientific pitch octave (C4 is middle C).
    #[must_use]
    pub fn octave(self) -> i8 {
        (self.0 / 12) as i8 - 1
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.pitch_name(), self.octave())
    }
}

/// The token alphabet: the C major scale upward from middle C.
///
/// The first eight entries span one octave (C4–C5), enough for a 4x4 board.
/// A 6x6 board needs 18 distinct tones and takes C4–F6, so no supported
/// board size reuses a token.
pub const TONE_ALPHABET: [Tone; 22] = [
    Tone(60), Tone(62), Tone(64), Tone(65), Tone(67), Tone(69), Tone(71),
    Tone(72), Tone(74), Tone(76), Tone(77), Tone(79), Tone(81), Tone(83),
    Tone(84), Tone(86), Tone(88), Tone(89), Tone(91), Tone(93), Tone(95),
    Tone(96),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_names() {
        assert_eq!(Tone::C4.to_string(), "C4");
        assert_eq!(Tone::A4.to_string(), "A4");
        assert_eq!(Tone::new(61).to_string(), "C#4");
        assert_eq!(Tone::new(72).to_string(), "C5");
        assert_eq!(Tone::new(21).to_string(), "A0");
    }

    #[test]
    fn test_alphabet_first_octave() {
        let names: Vec<_> = TONE_ALPHABET[..8].iter().map(Tone::to_string).collect();
        assert_eq!(names, ["C4", "D4", "E4", "F4", "G4", "A4", "B4", "C5"]);
    }

    #[test]
    fn test_alphabet_is_distinct_and_ascending() {
        for pair in TONE_ALPHABET.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(TONE_ALPHABET[TONE_ALPHABET.len() - 1].to_string(), "C7");
    }
}
