//! Dual-tone synthesis, used to render key presses into audio.

use crate::error::SynthError;
use crate::tones::ToneTable;
use std::f64::consts::TAU;
use std::sync::Arc;

/// Sum of two phase-continuous cosines.
pub struct DualToneOscillator {
    phase: [f64; 2],
    phase_inc: [f64; 2],
}

impl DualToneOscillator {
    pub fn new(sample_rate_hz: u32, low_hz: f64, high_hz: f64) -> Self {
        let rate = sample_rate_hz as f64;
        Self {
            phase: [0.0; 2],
            phase_inc: [TAU * low_hz / rate, TAU * high_hz / rate],
        }
    }

    /// Next sample in `[-1, 1]`.
    pub fn next(&mut self) -> f32 {
        let value = 0.5 * (self.phase[0].cos() + self.phase[1].cos());
        self.advance(1);
        value as f32
    }

    pub fn advance(&mut self, samples: usize) {
        if samples == 0 {
            return;
        }
        for (phase, inc) in self.phase.iter_mut().zip(self.phase_inc) {
            *phase = (*phase + inc * samples as f64).rem_euclid(TAU);
        }
    }

    pub fn reset(&mut self) {
        self.phase = [0.0; 2];
    }
}

/// Renders symbol strings as DTMF key presses.
pub struct DtmfModulator {
    sample_rate_hz: u32,
    table: Arc<ToneTable>,
    level: f32,
}

impl DtmfModulator {
    /// Create a modulator for the given sample rate, tone table and peak level.
    pub fn new(sample_rate_hz: u32, table: Arc<ToneTable>, level: f32) -> Result<Self, SynthError> {
        if sample_rate_hz == 0 {
            return Err(SynthError::ZeroSampleRate);
        }
        Ok(Self {
            sample_rate_hz,
            table,
            level,
        })
    }

    /// Render each symbol for `tone_seconds`, separated by `gap_seconds` of
    /// silence. Whitespace in `symbols` is skipped.
    pub fn modulate(
        &self,
        symbols: &str,
        tone_seconds: f64,
        gap_seconds: f64,
    ) -> Result<Vec<f32>, SynthError> {
        let tone_samples = self.seconds_to_samples(tone_seconds);
        let gap_samples = self.seconds_to_samples(gap_seconds);

        let pairs = symbols
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .map(|ch| self.table.tones(ch).ok_or(SynthError::UnknownSymbol(ch)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut out = Vec::with_capacity(pairs.len() * (tone_samples + gap_samples));
        for (i, &(low, high)) in pairs.iter().enumerate() {
            if i > 0 {
                out.resize(out.len() + gap_samples, 0.0);
            }
            let mut osc = DualToneOscillator::new(self.sample_rate_hz, low as f64, high as f64);
            out.extend((0..tone_samples).map(|_| osc.next() * self.level));
        }
        Ok(out)
    }

    fn seconds_to_samples(&self, seconds: f64) -> usize {
        (self.sample_rate_hz as f64 * seconds.max(0.0)).round() as usize
    }
}
