// File: dsp.rs
// This file contains the seam between the prosody analyzers and the DSP
// primitives they consume, and the default implementation built on the
// `spectrum` and `analysis` modules.

use log::debug;
use crate::analysis::{self, PeakPicking, PitchFrame};
use crate::config::{AnalysisConfig, PitchMethod};
use crate::error::AnalysisError;
use crate::spectrum::{magnitude_spectrogram, rfftfreq, rstft};

/// The frame-wise DSP primitives the analyzers are built on.
///
/// Implementations must be deterministic: the same input always gives the same
/// output. Errors are propagated unchanged by the pipeline.
pub trait DspBackend {
    /// Per-frame pitch estimates with their salience.
    fn pitch_track(&self, samples: &[f64], sample_rate: u32) -> Result<Vec<PitchFrame>, AnalysisError>;

    /// Onset strength envelope, one value per frame.
    fn onset_strength(&self, samples: &[f64], sample_rate: u32) -> Result<Vec<f64>, AnalysisError>;

    /// Frame indices of the onsets found in an onset strength envelope.
    fn onset_detect(&self, envelope: &[f64], sample_rate: u32) -> Result<Vec<usize>, AnalysisError>;

    /// Converts frame indices to seconds.
    fn frames_to_time(&self, frames: &[usize], sample_rate: u32) -> Vec<f64>;

    /// RMS energy per frame.
    fn rms_envelope(&self, samples: &[f64]) -> Result<Vec<f64>, AnalysisError>;

    /// The time in seconds of every frame of an envelope.
    fn frame_times(&self, envelope: &[f64], sample_rate: u32) -> Vec<f64>;

    /// Spectral centroid per frame, in Hz.
    fn spectral_centroid(&self, samples: &[f64], sample_rate: u32) -> Result<Vec<f64>, AnalysisError>;
}

/// The default backend: centred STFT framing for every primitive.
#[derive(Debug, Clone, Default)]
pub struct SpectralBackend {
    config: AnalysisConfig,
}

impl SpectralBackend {
    pub fn new(config: AnalysisConfig) -> SpectralBackend {
        SpectralBackend { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    fn magnitudes(&self, samples: &[f64]) -> Result<Vec<Vec<f64>>, AnalysisError> {
        let frame = &self.config.frame;
        let spectrogram = rstft(samples, frame.frame_length, frame.hop_length, frame.window, true)?;
        Ok(magnitude_spectrogram(&spectrogram))
    }
}

impl DspBackend for SpectralBackend {
    fn pitch_track(&self, samples: &[f64], sample_rate: u32) -> Result<Vec<PitchFrame>, AnalysisError> {
        let pitch = &self.config.pitch;
        let frame = &self.config.frame;
        // the search band stops at Nyquist; a band that closes up finds no pitch at all
        let f_max = f64::min(pitch.max_frequency, sample_rate as f64 / 2.0);
        if !(pitch.min_frequency < f_max) {
            debug!("pitch band {}..{} Hz is empty at {} Hz", pitch.min_frequency, f_max, sample_rate);
            return Ok(Vec::new());
        }
        match pitch.method {
            PitchMethod::SpectralPeak => {
                let mags = self.magnitudes(samples)?;
                let freqs = rfftfreq(frame.frame_length, sample_rate);
                Ok(analysis::spectral_peak_pitches(&mags, &freqs, pitch.min_frequency, f_max, pitch.threshold))
            }
            PitchMethod::Pyin => analysis::pyin_pitch_track(
                samples,
                sample_rate,
                pitch.min_frequency,
                f_max,
                frame.frame_length,
                frame.hop_length,
            ),
        }
    }

    fn onset_strength(&self, samples: &[f64], _sample_rate: u32) -> Result<Vec<f64>, AnalysisError> {
        Ok(analysis::onset_strength(&self.magnitudes(samples)?))
    }

    fn onset_detect(&self, envelope: &[f64], sample_rate: u32) -> Result<Vec<usize>, AnalysisError> {
        let onset = &self.config.onset;
        let picking = PeakPicking::from_seconds(
            onset.pre_max,
            onset.post_max,
            onset.pre_avg,
            onset.post_avg,
            onset.delta,
            onset.wait,
            sample_rate,
            self.config.frame.hop_length,
        );
        Ok(analysis::onset_detect(envelope, &picking))
    }

    fn frames_to_time(&self, frames: &[usize], sample_rate: u32) -> Vec<f64> {
        analysis::frames_to_time(frames, sample_rate, self.config.frame.hop_length)
    }

    fn rms_envelope(&self, samples: &[f64]) -> Result<Vec<f64>, AnalysisError> {
        let frame = &self.config.frame;
        Ok(analysis::rms_frames(samples, frame.frame_length, frame.hop_length)?)
    }

    fn frame_times(&self, envelope: &[f64], sample_rate: u32) -> Vec<f64> {
        let frames: Vec<usize> = (0..envelope.len()).collect();
        self.frames_to_time(&frames, sample_rate)
    }

    fn spectral_centroid(&self, samples: &[f64], sample_rate: u32) -> Result<Vec<f64>, AnalysisError> {
        let frame = &self.config.frame;
        Ok(analysis::spectral_centroid_frames(samples, sample_rate, frame.frame_length, frame.hop_length, frame.window)?)
    }
}
