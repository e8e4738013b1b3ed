use crate::error::WaveformError;

/// A fully loaded single-channel recording.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    sample_rate: u32,
    samples: Vec<f32>,
}

impl Waveform {
    /// Wrap mono samples.
    pub fn mono(sample_rate: u32, samples: Vec<f32>) -> Result<Self, WaveformError> {
        if sample_rate == 0 {
            return Err(WaveformError::ZeroSampleRate);
        }
        Ok(Self {
            sample_rate,
            samples,
        })
    }

    /// Fold interleaved multi-channel samples into one channel by summing each
    /// sample frame. A trailing incomplete sample frame is ignored.
    pub fn from_interleaved(
        sample_rate: u32,
        channels: u16,
        samples: &[f32],
    ) -> Result<Self, WaveformError> {
        if channels == 0 {
            return Err(WaveformError::ZeroChannels);
        }
        if channels == 1 {
            return Self::mono(sample_rate, samples.to_vec());
        }
        let folded = samples
            .chunks_exact(channels as usize)
            .map(|frame| frame.iter().sum())
            .collect();
        Self::mono(sample_rate, folded)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}
