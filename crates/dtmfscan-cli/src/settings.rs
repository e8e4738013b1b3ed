use std::path::Path;

use anyhow::{bail, Context, Result};
use dtmfscan::{Amplitude, Band, Decoder, ToneTable};
use serde::Deserialize;

use crate::cli::DecodeArgs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AmplitudeSetting {
    RealPart,
    Magnitude,
}

impl From<AmplitudeSetting> for Amplitude {
    fn from(value: AmplitudeSetting) -> Self {
        match value {
            AmplitudeSetting::RealPart => Amplitude::RealPart,
            AmplitudeSetting::Magnitude => Amplitude::Magnitude,
        }
    }
}

/// Decoder settings read from a TOML file. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub frame_ms: Option<f64>,
    pub tolerance_hz: Option<f32>,
    pub extended: Option<bool>,
    pub digits: Option<bool>,
    pub amplitude: Option<AmplitudeSetting>,
    pub low_band: Option<[f32; 2]>,
    pub high_band: Option<[f32; 2]>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid settings in {}", path.display()))
    }

    /// Combine with command-line flags (flags win) and build the decoder.
    pub fn decoder(&self, args: &DecodeArgs) -> Result<Decoder> {
        let table = match (args.extended, args.digits) {
            (true, _) => ToneTable::extended(),
            (_, true) => ToneTable::digits(),
            _ => match (self.extended.unwrap_or(false), self.digits.unwrap_or(false)) {
                (true, true) => bail!("settings enable both the extended and the digits keypad"),
                (true, false) => ToneTable::extended(),
                (false, true) => ToneTable::digits(),
                (false, false) => ToneTable::standard(),
            },
        };
        let amplitude = if args.magnitude {
            Amplitude::Magnitude
        } else {
            self.amplitude.map(Amplitude::from).unwrap_or_default()
        };

        let mut builder = Decoder::builder().tone_table(table).amplitude(amplitude);
        if let Some(ms) = args.frame_ms.or(self.frame_ms) {
            builder = builder.frame_seconds(ms / 1000.0);
        }
        if let Some(hz) = args.tolerance.or(self.tolerance_hz) {
            builder = builder.tolerance_hz(hz);
        }
        if let Some([low, high]) = self.low_band {
            builder = builder.low_band(Band::new(low, high));
        }
        if let Some([low, high]) = self.high_band {
            builder = builder.high_band(Band::new(low, high));
        }
        Ok(builder.build()?)
    }
}
