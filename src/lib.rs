/// File: lib.rs
/// This file stitches the crate together

pub mod audiofile;
pub mod analysis;
pub mod config;
pub mod dsp;
pub mod error;
pub mod mp;
pub mod pipeline;
pub mod prosody;
pub mod segment;
pub mod spectrum;

#[cfg(test)]
mod tests;

pub use audiofile::{AudioError, AudioFile, AudioFormat};
pub use config::{AnalysisConfig, FrameConfig, OnsetConfig, PauseConfig, PitchConfig, PitchMethod, TonalityConfig, VoiceConfig};
pub use dsp::{DspBackend, SpectralBackend};
pub use error::AnalysisError;
pub use mp::analyze_parallel;
pub use pipeline::{aggregate, analyze, analyze_default, AnalysisResult, TimeSeries};
pub use prosody::voice::VoiceCharacter;
pub use segment::{Segment, Segmentation, Waveform};
