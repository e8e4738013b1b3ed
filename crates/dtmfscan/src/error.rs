use thiserror::Error;

/// Which half of the keypad a tone belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneGroup {
    Low,
    High,
}

impl std::fmt::Display for ToneGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToneGroup::Low => write!(f, "low"),
            ToneGroup::High => write!(f, "high"),
        }
    }
}

/// Rejected decoder or tone table configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("no {0} tones configured")]
    EmptyToneGroup(ToneGroup),

    #[error("tone pair {low} Hz + {high} Hz uses a tone outside the candidate lists")]
    UnknownTone { low: u32, high: u32 },

    #[error("symbol '{0}' is mapped to more than one tone pair")]
    DuplicateSymbol(char),

    #[error("frame duration must be positive, got {0} s")]
    FrameDuration(f64),

    #[error("tolerance must be positive, got {0} Hz")]
    Tolerance(f32),

    #[error("{group} band [{low_hz}, {high_hz}) Hz is empty")]
    EmptyBand {
        group: ToneGroup,
        low_hz: f32,
        high_hz: f32,
    },
}

/// Rejected waveform construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WaveformError {
    #[error("sample rate must be positive")]
    ZeroSampleRate,

    #[error("channel count must be positive")]
    ZeroChannels,
}

/// Failure while rendering symbols to audio.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthError {
    #[error("no tone pair for symbol '{0}'")]
    UnknownSymbol(char),

    #[error("sample rate must be positive")]
    ZeroSampleRate,
}
