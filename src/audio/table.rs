//! Token to frequency lookup.

use crate::cards::Tone;

/// Concert pitch for A4.
pub const CONCERT_A_HZ: f64 = 440.0;

/// Equal-temperament frequency of a tone, tuned to A4 = 440 Hz.
///
/// ```
/// use tone_match::audio::frequency_hz;
/// use tone_match::cards::Tone;
///
/// assert_eq!(frequency_hz(Tone::A4), 440.0);
/// assert!((frequency_hz(Tone::C4) - 261.63).abs() < 0.01);
/// ```
#[must_use]
pub fn frequency_hz(tone: Tone) -> f64 {
    let semitones = f64::from(tone.note()) - f64::from(Tone::A4.note());
    CONCERT_A_HZ * (semitones / 12.0).exp2()
}
