// File: error.rs
// This file contains the error types shared by the analysis pipeline.

use thiserror::Error;
use crate::spectrum::SpectrumError;

/// Represents all errors that can stop a prosody analysis.
///
/// Insufficient or degenerate data never produces an error; those segments
/// simply score 0. These variants describe caller contract violations and
/// failures of the DSP primitives, which are propagated as-is.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("segment count must be at least 1, got {0}")]
    InvalidSegmentCount(usize),
    #[error("sample rate must be positive")]
    InvalidSampleRate,
    #[error("invalid analysis configuration: {0}")]
    InvalidConfig(String),
    #[error("{series} has {actual} values, expected {expected}")]
    ShapeMismatch {
        series: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("pitch tracker failed: {0}")]
    PitchTracker(String),
    #[error(transparent)]
    Spectrum(#[from] SpectrumError),
}
