use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use dtmfscan::{DtmfModulator, ToneTable};

mod cli;
mod settings;
mod timeline;
mod wav;

use cli::{Cli, Command, DecodeArgs, GenerateArgs};
use settings::Settings;

const GENERATE_LEVEL: f32 = 0.5;

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .init();

    match cli.command {
        Command::Decode(args) => decode(&args),
        Command::Generate(args) => generate(&args),
    }
}

fn decode(args: &DecodeArgs) -> Result<()> {
    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let decoder = settings.decoder(args)?;
    let waveform = wav::load(&args.file)?;
    log::info!(
        "decoding {:.2}s of audio with {} ms frames",
        waveform.duration_seconds(),
        decoder.frame_seconds() * 1000.0
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.timeline {
        let reports = decoder.reports(&waveform);
        timeline::write_timeline(&mut out, &reports)?;
    } else {
        let keys = if args.parallel {
            decoder.decode_parallel(&waveform)
        } else {
            decoder.decode(&waveform)
        };
        if keys.is_empty() {
            log::warn!("no DTMF keys found in {}", args.file.display());
        }
        writeln!(out, "{keys}")?;
    }
    Ok(())
}

fn generate(args: &GenerateArgs) -> Result<()> {
    let table = if args.extended {
        ToneTable::extended()
    } else {
        ToneTable::standard()
    };
    let modulator = DtmfModulator::new(args.sample_rate, table, GENERATE_LEVEL)?;
    let samples = modulator.modulate(&args.symbols, args.tone_ms / 1000.0, args.gap_ms / 1000.0)?;
    wav::write_mono_i16(&args.output, args.sample_rate, &samples)
        .with_context(|| format!("writing {}", args.output.display()))?;
    log::info!(
        "wrote {} samples to {}",
        samples.len(),
        args.output.display()
    );
    Ok(())
}
