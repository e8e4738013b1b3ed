use std::path::Path;

use anyhow::{Context, Result};
use dtmfscan::Waveform;

/// Read a WAV file, folding all channels into one.
///
/// Integer samples keep their raw scale; the analysis does not depend on it.
pub fn load(path: &Path) -> Result<Waveform> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("cannot open {} as a WAV file", path.display()))?;
    let spec = reader.spec();
    log::info!(
        "{}: {} Hz, {} channel(s), {}-bit {:?}, {} samples",
        path.display(),
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample,
        spec.sample_format,
        reader.len()
    );

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .with_context(|| format!("corrupt sample data in {}", path.display()))?,
        hound::SampleFormat::Int => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f32))
            .collect::<Result<_, _>>()
            .with_context(|| format!("corrupt sample data in {}", path.display()))?,
    };

    Waveform::from_interleaved(spec.sample_rate, spec.channels, &samples)
        .with_context(|| format!("unusable audio in {}", path.display()))
}

/// Write mono samples in `[-1, 1]` as 16-bit PCM.
pub fn write_mono_i16(path: &Path, sample_rate: u32, samples: &[f32]) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("cannot create {}", path.display()))?;
    for &s in samples {
        writer.write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}
