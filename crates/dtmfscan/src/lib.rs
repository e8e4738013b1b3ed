//! Offline DTMF decoding: recovers dialed keys from a recorded waveform.

pub mod analyze;
pub mod decode;
pub mod error;
pub mod synth;
pub mod tones;
pub mod waveform;

pub use analyze::{find_dominant_frequency, Amplitude, Band, SpectrumAnalyzer};
pub use decode::{Decoder, DecoderBuilder, FrameReport, FrameTones};
pub use error::{ConfigError, SynthError, WaveformError};
pub use synth::DtmfModulator;
pub use tones::ToneTable;
pub use waveform::Waveform;
