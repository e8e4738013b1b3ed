//! Per-frame spectral analysis: FFT, band-limited peak search and snapping
//! the peak to a candidate tone.

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// How a complex FFT coefficient is reduced to a comparable amplitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Amplitude {
    /// `|re|`. Phase sensitive, kept for compatibility with recorded results.
    #[default]
    RealPart,
    /// `sqrt(re² + im²)`.
    Magnitude,
}

impl Amplitude {
    pub fn of(self, c: Complex<f32>) -> f32 {
        match self {
            Amplitude::RealPart => c.re.abs(),
            Amplitude::Magnitude => c.norm(),
        }
    }
}

/// Half-open frequency range `[low_hz, high_hz)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub low_hz: f32,
    pub high_hz: f32,
}

impl Band {
    pub const LOW: Band = Band::new(0.0, 960.0);
    pub const HIGH: Band = Band::new(1180.0, 1500.0);
    /// High band wide enough to reach the 1633 Hz column.
    pub const EXTENDED_HIGH: Band = Band::new(1180.0, 1700.0);

    pub const fn new(low_hz: f32, high_hz: f32) -> Self {
        Self { low_hz, high_hz }
    }

    pub fn contains(&self, freq_hz: f32) -> bool {
        freq_hz >= self.low_hz && freq_hz < self.high_hz
    }
}

/// Frequency label of every FFT bin, negative above the midpoint.
pub fn fft_frequencies(len: usize, sample_rate: u32) -> Vec<f32> {
    let spacing = sample_rate as f64 / len as f64;
    let positive = len.div_ceil(2);
    (0..len)
        .map(|k| {
            let k = if k < positive {
                k as f64
            } else {
                k as f64 - len as f64
            };
            (k * spacing) as f32
        })
        .collect()
}

/// Snap an observed peak to the closest candidate strictly within `tolerance_hz`.
///
/// Earlier candidates win exact ties.
pub fn nearest_tone(peak_hz: f32, candidates: &[u32], tolerance_hz: f32) -> Option<u32> {
    let mut error = tolerance_hz;
    let mut closest = None;
    for &f in candidates {
        let diff = (peak_hz - f as f32).abs();
        if diff < error {
            error = diff;
            closest = Some(f);
        }
    }
    closest
}

/// The transform of one frame, labelled with bin frequencies.
pub struct Spectrum<'a> {
    frequencies: &'a [f32],
    bins: Vec<Complex<f32>>,
}

impl Spectrum<'_> {
    /// Frequency of the strongest bin inside `band`, or `None` if no bin falls in it.
    ///
    /// The first (lowest-index) bin wins ties, so an all-zero frame peaks at the
    /// bottom of the band.
    pub fn peak(&self, band: Band, amplitude: Amplitude) -> Option<f32> {
        let mut best: Option<(f32, f32)> = None;
        for (&freq, &bin) in self.frequencies.iter().zip(&self.bins) {
            if !band.contains(freq) {
                continue;
            }
            let amp = amplitude.of(bin);
            match best {
                Some((_, max)) if amp <= max => {}
                _ => best = Some((freq, amp)),
            }
        }
        best.map(|(freq, _)| freq)
    }
}

/// FFT planned once for a fixed frame length and sample rate.
#[derive(Clone)]
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    frequencies: Vec<f32>,
}

impl SpectrumAnalyzer {
    /// # Panics
    /// Panics if `frame_len` is zero.
    pub fn new(sample_rate: u32, frame_len: usize) -> Self {
        assert!(frame_len > 0, "frame length must be at least one sample");
        let mut planner = FftPlanner::<f32>::new();
        Self {
            fft: planner.plan_fft_forward(frame_len),
            frequencies: fft_frequencies(frame_len, sample_rate),
        }
    }

    pub fn frame_len(&self) -> usize {
        self.frequencies.len()
    }

    /// # Panics
    /// Panics if `frame` is not exactly `frame_len` samples.
    pub fn spectrum(&self, frame: &[f32]) -> Spectrum<'_> {
        assert_eq!(
            frame.len(),
            self.frame_len(),
            "frame length does not match the planned FFT"
        );
        let mut bins: Vec<Complex<f32>> = frame.iter().map(|&x| Complex::new(x, 0.0)).collect();
        self.fft.process(&mut bins);
        Spectrum {
            frequencies: &self.frequencies,
            bins,
        }
    }

    pub fn find_dominant_frequency(
        &self,
        frame: &[f32],
        band: Band,
        candidates: &[u32],
        tolerance_hz: f32,
        amplitude: Amplitude,
    ) -> Option<u32> {
        let peak = self.spectrum(frame).peak(band, amplitude)?;
        nearest_tone(peak, candidates, tolerance_hz)
    }
}

/// One-shot analysis of a single frame: the candidate closest to the strongest
/// bin in `band`, if it lies within `tolerance_hz`.
///
/// # Panics
/// Panics if `frame` is empty.
pub fn find_dominant_frequency(
    frame: &[f32],
    sample_rate: u32,
    band: Band,
    candidates: &[u32],
    tolerance_hz: f32,
    amplitude: Amplitude,
) -> Option<u32> {
    SpectrumAnalyzer::new(sample_rate, frame.len()).find_dominant_frequency(
        frame,
        band,
        candidates,
        tolerance_hz,
        amplitude,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tones::{HIGH_TONES_HZ, LOW_TONES_HZ};

    fn cosine(freq_hz: f64, sample_rate: u32, len: usize, level: f32) -> Vec<f32> {
        (0..len)
            .map(|n| {
                let t = n as f64 / sample_rate as f64;
                level * (std::f64::consts::TAU * freq_hz * t).cos() as f32
            })
            .collect()
    }

    fn sine(freq_hz: f64, sample_rate: u32, len: usize, level: f32) -> Vec<f32> {
        (0..len)
            .map(|n| {
                let t = n as f64 / sample_rate as f64;
                level * (std::f64::consts::TAU * freq_hz * t).sin() as f32
            })
            .collect()
    }

    fn mix(a: &[f32], b: &[f32]) -> Vec<f32> {
        a.iter().zip(b).map(|(x, y)| x + y).collect()
    }

    #[test]
    fn frequencies_follow_two_sided_convention() {
        assert_eq!(
            fft_frequencies(8, 8),
            vec![0.0, 1.0, 2.0, 3.0, -4.0, -3.0, -2.0, -1.0]
        );
        assert_eq!(fft_frequencies(5, 10), vec![0.0, 2.0, 4.0, -4.0, -2.0]);
    }

    #[test]
    fn band_is_half_open() {
        assert!(Band::HIGH.contains(1180.0));
        assert!(Band::HIGH.contains(1499.9));
        assert!(!Band::HIGH.contains(1500.0));
        assert!(!Band::LOW.contains(-25.0));
    }

    #[test]
    fn nearest_tone_is_strict() {
        assert_eq!(nearest_tone(712.0, &LOW_TONES_HZ, 15.0), None);
        assert_eq!(nearest_tone(711.9, &LOW_TONES_HZ, 15.0), Some(697));
        assert_eq!(nearest_tone(760.0, &LOW_TONES_HZ, 15.0), Some(770));
        assert_eq!(nearest_tone(0.0, &LOW_TONES_HZ, 15.0), None);
    }

    #[test]
    fn nearest_tone_prefers_closer_then_earlier() {
        assert_eq!(nearest_tone(105.0, &[100, 108], 10.0), Some(108));
        assert_eq!(nearest_tone(104.0, &[100, 108], 10.0), Some(100));
    }

    #[test]
    fn detects_both_bands_of_a_key() {
        // 20 Hz bins: 700 and 1340 fall exactly on bins.
        let frame = mix(
            &cosine(700.0, 8000, 400, 1.0),
            &cosine(1340.0, 8000, 400, 1.0),
        );
        let analyzer = SpectrumAnalyzer::new(8000, 400);
        let low =
            analyzer.find_dominant_frequency(&frame, Band::LOW, &LOW_TONES_HZ, 15.0, Amplitude::RealPart);
        let high = analyzer.find_dominant_frequency(
            &frame,
            Band::HIGH,
            &HIGH_TONES_HZ,
            15.0,
            Amplitude::RealPart,
        );
        assert_eq!(low, Some(697));
        assert_eq!(high, Some(1336));
    }

    #[test]
    fn tolerance_boundary() {
        // One second frame gives 1 Hz bins.
        let at_edge = cosine(712.0, 8000, 8000, 1.0);
        let inside = cosine(711.0, 8000, 8000, 1.0);
        assert_eq!(
            find_dominant_frequency(&at_edge, 8000, Band::LOW, &LOW_TONES_HZ, 15.0, Amplitude::RealPart),
            None
        );
        assert_eq!(
            find_dominant_frequency(&inside, 8000, Band::LOW, &LOW_TONES_HZ, 15.0, Amplitude::RealPart),
            Some(697)
        );
    }

    #[test]
    fn result_is_scale_invariant() {
        let analyzer = SpectrumAnalyzer::new(8000, 400);
        for level in [1.0e-3, 1.0, 250.0, 30_000.0] {
            let frame = mix(
                &cosine(860.0, 8000, 400, level),
                &cosine(1480.0, 8000, 400, level),
            );
            for amplitude in [Amplitude::RealPart, Amplitude::Magnitude] {
                assert_eq!(
                    analyzer.find_dominant_frequency(&frame, Band::LOW, &LOW_TONES_HZ, 15.0, amplitude),
                    Some(852)
                );
                assert_eq!(
                    analyzer.find_dominant_frequency(&frame, Band::HIGH, &HIGH_TONES_HZ, 15.0, amplitude),
                    Some(1477)
                );
            }
        }
    }

    #[test]
    fn amplitude_variants_disagree_on_sine_phase() {
        // A sine puts its energy in the imaginary part; only the magnitude sees it.
        let frame = mix(
            &sine(700.0, 8000, 400, 2.0),
            &cosine(860.0, 8000, 400, 1.0),
        );
        let analyzer = SpectrumAnalyzer::new(8000, 400);
        assert_eq!(
            analyzer.find_dominant_frequency(&frame, Band::LOW, &LOW_TONES_HZ, 15.0, Amplitude::RealPart),
            Some(852)
        );
        assert_eq!(
            analyzer.find_dominant_frequency(&frame, Band::LOW, &LOW_TONES_HZ, 15.0, Amplitude::Magnitude),
            Some(697)
        );
    }

    #[test]
    fn silence_peaks_at_band_floor() {
        let analyzer = SpectrumAnalyzer::new(8000, 400);
        let frame = vec![0.0; 400];
        let spectrum = analyzer.spectrum(&frame);
        assert_eq!(spectrum.peak(Band::LOW, Amplitude::RealPart), Some(0.0));
        assert_eq!(spectrum.peak(Band::HIGH, Amplitude::RealPart), Some(1180.0));
        assert_eq!(
            analyzer.find_dominant_frequency(&frame, Band::LOW, &LOW_TONES_HZ, 15.0, Amplitude::RealPart),
            None
        );
    }

    #[test]
    fn empty_band_is_no_match() {
        let frame = cosine(700.0, 8000, 400, 1.0);
        let above_nyquist = Band::new(5000.0, 6000.0);
        assert_eq!(
            find_dominant_frequency(&frame, 8000, above_nyquist, &[5500], 15.0, Amplitude::RealPart),
            None
        );
    }

    #[test]
    #[should_panic]
    fn empty_frame_panics() {
        find_dominant_frequency(&[], 8000, Band::LOW, &LOW_TONES_HZ, 15.0, Amplitude::RealPart);
    }
}
