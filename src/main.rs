// File: main.rs
// This file contains the command line front end: it reads an audio file, runs
// the prosody analysis and prints the result as JSON.

use std::path::PathBuf;
use std::sync::Arc;
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use prosody::{analyze, analyze_parallel, audiofile, AnalysisConfig, SpectralBackend, Waveform};

/// Analyze the prosody of a speech recording
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Audio file to analyze (WAV, AIFF, FLAC, MP3, ...)
    file: PathBuf,

    /// Number of equal-width segments
    #[arg(short, long, default_value = "5", value_parser = clap::value_parser!(u32).range(1..=50))]
    segments: u32,

    /// JSON configuration file overriding the analysis defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Worker threads; analyzes on the main thread when omitted
    #[arg(short, long)]
    threads: Option<usize>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match &args.config {
        Some(path) => AnalysisConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    let audio = audiofile::read(&args.file).with_context(|| format!("reading {}", args.file.display()))?;
    info!("{}: {:.2} s, {} channels at {} Hz", args.file.display(), audio.duration, audio.num_channels, audio.sample_rate);
    let waveform = Waveform::from(audio);

    let segments = args.segments as usize;
    let backend = SpectralBackend::new(config.clone());
    let result = match args.threads {
        Some(threads) => analyze_parallel(Arc::new(waveform), segments, &config, Arc::new(backend), Some(threads)),
        None => analyze(&waveform, segments, &config, &backend),
    }
    .context("analysis failed")?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", json);
    Ok(())
}
