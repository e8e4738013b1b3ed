use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "dtmfscan", version, about = "Decode DTMF key presses from WAV recordings")]
pub struct Cli {
    /// Log level: error, warn, info, debug, trace.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: log::LevelFilter,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the keys dialed in a WAV file.
    Decode(DecodeArgs),
    /// Render keys into a 16-bit mono WAV file.
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// WAV file to analyze.
    pub file: PathBuf,

    /// TOML file with decoder settings. Flags given here take precedence.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Accepted frequency error in Hz.
    #[arg(short, long)]
    pub tolerance: Option<f32>,

    /// Analysis frame duration in milliseconds.
    #[arg(long)]
    pub frame_ms: Option<f64>,

    /// Recognize the A-D column (1633 Hz).
    #[arg(long, default_value_t = false)]
    pub extended: bool,

    /// Recognize only the digits 0-9; '*' and '#' decode to nothing.
    #[arg(long, default_value_t = false, conflicts_with = "extended")]
    pub digits: bool,

    /// Rank FFT bins by full magnitude instead of the real part.
    #[arg(long, default_value_t = false)]
    pub magnitude: bool,

    /// Print one line per second of audio, with '.' for frames without a key.
    #[arg(long, default_value_t = false)]
    pub timeline: bool,

    /// Analyze frames on all cores.
    #[arg(long, default_value_t = false)]
    pub parallel: bool,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Keys to render, e.g. "0123456789*#".
    pub symbols: String,

    /// Output WAV file.
    #[arg(short, long)]
    pub output: PathBuf,

    #[arg(long, default_value_t = 8000)]
    pub sample_rate: u32,

    /// Duration of each key press in milliseconds.
    #[arg(long, default_value_t = 200.0)]
    pub tone_ms: f64,

    /// Silence between key presses in milliseconds.
    #[arg(long, default_value_t = 100.0)]
    pub gap_ms: f64,

    /// Allow the A-D keys.
    #[arg(long, default_value_t = false)]
    pub extended: bool,
}
