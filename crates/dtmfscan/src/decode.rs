//! Frame-by-frame tone classification and key debouncing.

use crate::analyze::{Amplitude, Band, SpectrumAnalyzer};
use crate::error::{ConfigError, ToneGroup};
use crate::tones::ToneTable;
use crate::waveform::Waveform;
use rayon::prelude::*;
use std::sync::Arc;

pub const DEFAULT_FRAME_SECONDS: f64 = 0.04;
pub const DEFAULT_TOLERANCE_HZ: f32 = 15.0;

/// Frame length in samples for a recording of `total_samples`.
///
/// The recording is divided into `floor(duration / frame_seconds)` frames and
/// the length is the integer share of each. Returns `None` when not even one
/// frame fits.
pub fn frame_step(total_samples: usize, sample_rate: u32, frame_seconds: f64) -> Option<usize> {
    if sample_rate == 0 || !(frame_seconds > 0.0) {
        return None;
    }
    let duration = total_samples as f64 / sample_rate as f64;
    let frames = (duration / frame_seconds).floor();
    if frames < 1.0 {
        return None;
    }
    let step = total_samples / frames as usize;
    (step >= 1).then_some(step)
}

/// Key debouncing state carried from one frame to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Debounce {
    #[default]
    Idle,
    Held(char),
}

impl Debounce {
    /// Apply one frame's detection. Returns the next state and the symbol to
    /// emit, if any.
    pub fn advance(self, detected: Option<char>) -> (Self, Option<char>) {
        match (self, detected) {
            (_, None) => (Debounce::Idle, None),
            (Debounce::Held(held), Some(symbol)) if held == symbol => (self, None),
            (_, Some(symbol)) => (Debounce::Held(symbol), Some(symbol)),
        }
    }
}

/// Snapped tones of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameTones {
    pub low_hz: Option<u32>,
    pub high_hz: Option<u32>,
}

/// What happened in one analyzed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub index: usize,
    pub start_sample: usize,
    /// Nominal start time, `index * frame_seconds`.
    pub start_seconds: f64,
    pub tones: FrameTones,
    /// Symbol for the tone pair, when both bands matched.
    pub symbol: Option<char>,
    /// Symbol emitted after debouncing.
    pub emitted: Option<char>,
}

/// Decodes DTMF key presses from a recorded waveform.
///
/// A decoder holds only immutable configuration, so a single instance can
/// decode any number of waveforms, from any number of threads.
#[derive(Debug, Clone)]
pub struct Decoder {
    frame_seconds: f64,
    tolerance_hz: f32,
    low_band: Band,
    high_band: Band,
    table: Arc<ToneTable>,
    amplitude: Amplitude,
}

impl Decoder {
    /// Create a builder with default settings.
    pub fn builder() -> DecoderBuilder {
        DecoderBuilder::new()
    }

    pub fn table(&self) -> &ToneTable {
        &self.table
    }

    pub fn frame_seconds(&self) -> f64 {
        self.frame_seconds
    }

    pub fn tolerance_hz(&self) -> f32 {
        self.tolerance_hz
    }

    pub fn bands(&self) -> (Band, Band) {
        (self.low_band, self.high_band)
    }

    pub fn amplitude(&self) -> Amplitude {
        self.amplitude
    }

    /// Decode the whole waveform into the sequence of pressed keys.
    pub fn decode(&self, waveform: &Waveform) -> String {
        self.reports(waveform)
            .into_iter()
            .filter_map(|report| report.emitted)
            .collect()
    }

    /// Like [`Decoder::decode`], analyzing frames on the rayon thread pool.
    /// Debouncing still runs over the frames in order.
    pub fn decode_parallel(&self, waveform: &Waveform) -> String {
        let Some(step) = self.step_for(waveform) else {
            return String::new();
        };
        let analyzer = SpectrumAnalyzer::new(waveform.sample_rate(), step);
        let tones: Vec<FrameTones> = waveform
            .samples()
            .par_chunks_exact(step)
            .map(|frame| self.classify(&analyzer, frame))
            .collect();
        self.fold(tones, step)
            .into_iter()
            .filter_map(|report| report.emitted)
            .collect()
    }

    /// Per-frame view of the decode. Frames are non-overlapping and the
    /// trailing partial frame is not analyzed.
    pub fn reports(&self, waveform: &Waveform) -> Vec<FrameReport> {
        let Some(step) = self.step_for(waveform) else {
            return Vec::new();
        };
        let analyzer = SpectrumAnalyzer::new(waveform.sample_rate(), step);
        let tones = waveform
            .samples()
            .chunks_exact(step)
            .map(|frame| self.classify(&analyzer, frame));
        self.fold(tones, step)
    }

    fn step_for(&self, waveform: &Waveform) -> Option<usize> {
        let step = frame_step(waveform.len(), waveform.sample_rate(), self.frame_seconds);
        match step {
            Some(step) => log::debug!(
                "{} samples at {} Hz: {} frames of {} samples",
                waveform.len(),
                waveform.sample_rate(),
                waveform.len() / step,
                step
            ),
            None => log::debug!(
                "{} samples at {} Hz is shorter than one frame",
                waveform.len(),
                waveform.sample_rate()
            ),
        }
        step
    }

    fn classify(&self, analyzer: &SpectrumAnalyzer, frame: &[f32]) -> FrameTones {
        let spectrum = analyzer.spectrum(frame);
        let snap = |band: Band, candidates: &[u32]| {
            let peak = spectrum.peak(band, self.amplitude)?;
            crate::analyze::nearest_tone(peak, candidates, self.tolerance_hz)
        };
        FrameTones {
            low_hz: snap(self.low_band, self.table.low_tones()),
            high_hz: snap(self.high_band, self.table.high_tones()),
        }
    }

    fn fold<I>(&self, tones: I, step: usize) -> Vec<FrameReport>
    where
        I: IntoIterator<Item = FrameTones>,
    {
        let mut state = Debounce::Idle;
        tones
            .into_iter()
            .enumerate()
            .map(|(index, tones)| {
                let symbol = match (tones.low_hz, tones.high_hz) {
                    (Some(low), Some(high)) => self.table.symbol(low, high),
                    _ => None,
                };
                let (next, emitted) = match (tones.low_hz, tones.high_hz, symbol) {
                    // A pair the keypad has no key for leaves a held key held.
                    (Some(_), Some(_), None) => (state, None),
                    _ => state.advance(symbol),
                };
                state = next;

                let start_sample = index * step;
                let start_seconds = index as f64 * self.frame_seconds;
                log::trace!(
                    "frame {index} @ {start_seconds:.3}s: low {:?} high {:?}",
                    tones.low_hz,
                    tones.high_hz
                );
                if let Some(ch) = emitted {
                    log::debug!("key '{ch}' at {start_seconds:.3}s");
                }

                FrameReport {
                    index,
                    start_sample,
                    start_seconds,
                    tones,
                    symbol,
                    emitted,
                }
            })
            .collect()
    }
}

/// Builder for configuring a [`Decoder`].
pub struct DecoderBuilder {
    frame_seconds: f64,
    tolerance_hz: f32,
    low_band: Band,
    high_band: Option<Band>,
    table: Arc<ToneTable>,
    amplitude: Amplitude,
}

impl Default for DecoderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DecoderBuilder {
    /// Defaults: 40 ms frames, 15 Hz tolerance, the standard 12-key table and
    /// real-part amplitudes.
    pub fn new() -> Self {
        Self {
            frame_seconds: DEFAULT_FRAME_SECONDS,
            tolerance_hz: DEFAULT_TOLERANCE_HZ,
            low_band: Band::LOW,
            high_band: None,
            table: ToneTable::standard(),
            amplitude: Amplitude::default(),
        }
    }

    /// Set the nominal frame duration in seconds.
    pub fn frame_seconds(mut self, frame_seconds: f64) -> Self {
        self.frame_seconds = frame_seconds;
        self
    }

    /// Set the accepted distance between a peak and a candidate tone.
    pub fn tolerance_hz(mut self, tolerance_hz: f32) -> Self {
        self.tolerance_hz = tolerance_hz;
        self
    }

    pub fn low_band(mut self, band: Band) -> Self {
        self.low_band = band;
        self
    }

    /// Set the high band explicitly. Without this the band is chosen to cover
    /// the table's highest tone.
    pub fn high_band(mut self, band: Band) -> Self {
        self.high_band = Some(band);
        self
    }

    pub fn tone_table(mut self, table: Arc<ToneTable>) -> Self {
        self.table = table;
        self
    }

    pub fn amplitude(mut self, amplitude: Amplitude) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Validate and build the decoder.
    pub fn build(self) -> Result<Decoder, ConfigError> {
        if !(self.frame_seconds > 0.0) || !self.frame_seconds.is_finite() {
            return Err(ConfigError::FrameDuration(self.frame_seconds));
        }
        if !(self.tolerance_hz > 0.0) || !self.tolerance_hz.is_finite() {
            return Err(ConfigError::Tolerance(self.tolerance_hz));
        }

        let high_band = self.high_band.unwrap_or_else(|| {
            if self.table.highest_tone() as f32 >= Band::HIGH.high_hz {
                Band::EXTENDED_HIGH
            } else {
                Band::HIGH
            }
        });
        for (group, band) in [(ToneGroup::Low, self.low_band), (ToneGroup::High, high_band)] {
            if !(band.low_hz < band.high_hz) {
                return Err(ConfigError::EmptyBand {
                    group,
                    low_hz: band.low_hz,
                    high_hz: band.high_hz,
                });
            }
        }

        Ok(Decoder {
            frame_seconds: self.frame_seconds,
            tolerance_hz: self.tolerance_hz,
            low_band: self.low_band,
            high_band,
            table: self.table,
            amplitude: self.amplitude,
        })
    }
}
