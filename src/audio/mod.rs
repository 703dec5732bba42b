//! Audio boundary: token frequencies and the tone sink.

mod table;
mod sink;

pub use table::{frequency_hz, CONCERT_A_HZ};
pub use sink::{SilentSink, ToneSink};
