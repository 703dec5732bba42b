//! Tone output boundary.
//!
//! The session controller asks a `ToneSink` to play a frequency whenever a
//! flip is accepted. Synthesis lives outside this crate; a host without an
//! audio backend uses [`SilentSink`] and the game plays the same.

/// Receiver for tone requests.
pub trait ToneSink {
    /// Play a short tone at `frequency_hz`. Must not block.
    fn play_tone(&mut self, frequency_hz: f64);
}

/// Sink that drops every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentSink;

impl ToneSink for SilentSink {
    fn play_tone(&mut self, _frequency_hz: f64) {}
}

impl<S: ToneSink + ?Sized> ToneSink for Box<S> {
    fn play_tone(&mut self, frequency_hz: f64) {
        (**self).play_tone(frequency_hz);
    }
}
