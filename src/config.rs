// File: config.rs
// This file contains the analysis configuration. Every calibrated constant the
// analyzers use lives here with its default, so it can be retuned without
// touching the algorithms.

use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::AnalysisError;
use crate::spectrum::WindowType;

/// Complete configuration of a prosody analysis.
///
/// Missing fields fall back to their defaults when deserializing, so a
/// configuration file only needs the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    pub frame: FrameConfig,
    pub pitch: PitchConfig,
    pub tonality: TonalityConfig,
    pub onset: OnsetConfig,
    pub pause: PauseConfig,
    pub voice: VoiceConfig,
}

/// STFT and RMS framing shared by every frame-wise primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub frame_length: usize,
    pub hop_length: usize,
    pub window: WindowType,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            frame_length: 2048,
            hop_length: 512,
            window: WindowType::Hanning,
        }
    }
}

/// Pitch tracking method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchMethod {
    /// Local magnitude peaks of the STFT, refined by parabolic interpolation
    SpectralPeak,
    /// Probabilistic YIN
    Pyin,
}

impl Default for PitchMethod {
    fn default() -> Self {
        Self::SpectralPeak
    }
}

/// Pitch tracker settings. The search band is wider than the vocal range the
/// tonality analyzer keeps, so out-of-range frames are seen and discarded there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchConfig {
    pub method: PitchMethod,
    pub min_frequency: f64,
    pub max_frequency: f64,
    /// Peaks below this fraction of the frame maximum are ignored (spectral peak method)
    pub threshold: f64,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            method: PitchMethod::SpectralPeak,
            min_frequency: 60.0,
            max_frequency: 2000.0,
            threshold: 0.1,
        }
    }
}

/// Tonality (pitch variability) scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TonalityConfig {
    /// Exclusive lower bound of the vocal range in Hz
    pub min_frequency: f64,
    /// Exclusive upper bound of the vocal range in Hz
    pub max_frequency: f64,
    pub min_candidates: usize,
    /// Segments shorter than this (seconds) score 0
    pub min_segment_duration: f64,
    pub variability_weight: f64,
    pub range_weight: f64,
    pub lower_percentile: f64,
    pub upper_percentile: f64,
    pub scale: f64,
    pub max_score: f64,
}

impl Default for TonalityConfig {
    fn default() -> Self {
        Self {
            min_frequency: 70.0,
            max_frequency: 400.0,
            min_candidates: 5,
            min_segment_duration: 0.5,
            variability_weight: 0.6,
            range_weight: 0.4,
            lower_percentile: 10.0,
            upper_percentile: 90.0,
            scale: 120.0,
            max_score: 100.0,
        }
    }
}

/// Onset peak picking windows, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnsetConfig {
    pub pre_max: f64,
    pub post_max: f64,
    pub pre_avg: f64,
    pub post_avg: f64,
    pub delta: f64,
    pub wait: f64,
}

impl Default for OnsetConfig {
    fn default() -> Self {
        Self {
            pre_max: 0.03,
            post_max: 0.0,
            pre_avg: 0.10,
            post_avg: 0.10,
            delta: 0.07,
            wait: 0.03,
        }
    }
}

/// Pause detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PauseConfig {
    /// Silence threshold as a fraction of the segment's mean RMS
    pub threshold_ratio: f64,
    /// Frames at or below this RMS are always silent
    pub silence_floor: f64,
    /// Frame step in seconds when the envelope has fewer than two frames
    pub fallback_frame_step: f64,
}

impl Default for PauseConfig {
    fn default() -> Self {
        Self {
            threshold_ratio: 0.5,
            silence_floor: 1e-10,
            fallback_frame_step: 0.01,
        }
    }
}

/// Spectral centroid anchors of the voice character scale, in Hz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Centroid at or below which a voice scores fully masculine
    pub masculine_anchor: f64,
    /// Centroid at or above which a voice scores fully feminine
    pub feminine_anchor: f64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            masculine_anchor: 1000.0,
            feminine_anchor: 4000.0,
        }
    }
}

impl AnalysisConfig {
    /// Load config from a JSON file, or the defaults if the file does not exist
    pub fn load(path: &Path) -> Result<Self, AnalysisError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| AnalysisError::InvalidConfig(format!("failed to read {}: {}", path.display(), e)))?;
        let config: AnalysisConfig = serde_json::from_str(&content)
            .map_err(|e| AnalysisError::InvalidConfig(format!("failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values the analyzers divide by or compare against.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let invalid = |msg: &str| Err(AnalysisError::InvalidConfig(msg.to_string()));

        if self.frame.frame_length == 0 {
            return invalid("frame.frame_length must be positive");
        }
        if self.frame.hop_length == 0 {
            return invalid("frame.hop_length must be positive");
        }
        if !(self.pitch.min_frequency < self.pitch.max_frequency) {
            return invalid("pitch.min_frequency must be below pitch.max_frequency");
        }
        if !(self.tonality.min_frequency < self.tonality.max_frequency) {
            return invalid("tonality.min_frequency must be below tonality.max_frequency");
        }
        if !(0.0..=100.0).contains(&self.tonality.lower_percentile)
            || !(0.0..=100.0).contains(&self.tonality.upper_percentile)
            || self.tonality.lower_percentile > self.tonality.upper_percentile
        {
            return invalid("tonality percentiles must satisfy 0 <= lower <= upper <= 100");
        }
        if !(self.tonality.max_score > 0.0) {
            return invalid("tonality.max_score must be positive");
        }
        let onset = &self.onset;
        for window in [onset.pre_max, onset.post_max, onset.pre_avg, onset.post_avg, onset.wait] {
            if !(window.is_finite() && window >= 0.0) {
                return invalid("onset windows must be finite and not negative");
            }
        }
        if !onset.delta.is_finite() {
            return invalid("onset.delta must be finite");
        }
        if !(self.pause.threshold_ratio >= 0.0) {
            return invalid("pause.threshold_ratio must not be negative");
        }
        if !(self.pause.fallback_frame_step > 0.0) {
            return invalid("pause.fallback_frame_step must be positive");
        }
        if self.voice.feminine_anchor == self.voice.masculine_anchor
            || !self.voice.feminine_anchor.is_finite()
            || !self.voice.masculine_anchor.is_finite()
        {
            return invalid("voice anchors must be finite and distinct");
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    /// A partial file only overrides what it names.
    fn partial_json_fills_defaults() {
        let config: AnalysisConfig = serde_json::from_str(
            r#"{ "tonality": { "scale": 90.0 }, "pitch": { "method": "pyin" } }"#,
        ).unwrap();
        assert_eq!(config.tonality.scale, 90.0);
        assert_eq!(config.tonality.min_candidates, 5);
        assert_eq!(config.pitch.method, PitchMethod::Pyin);
        assert_eq!(config.voice, VoiceConfig::default());
    }

    #[test]
    fn json_round_trip() {
        let mut config = AnalysisConfig::default();
        config.frame.window = WindowType::Hamming;
        config.voice.feminine_anchor = 3500.0;
        let json = serde_json::to_string(&config).unwrap();
        let back: AnalysisConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = AnalysisConfig::default();
        config.voice.masculine_anchor = config.voice.feminine_anchor;
        assert!(matches!(config.validate(), Err(AnalysisError::InvalidConfig(_))));

        let mut config = AnalysisConfig::default();
        config.frame.hop_length = 0;
        assert!(matches!(config.validate(), Err(AnalysisError::InvalidConfig(_))));
    }

    #[test]
    fn onset_windows_are_checked() {
        let config: AnalysisConfig = serde_json::from_str(r#"{ "onset": { "pre_avg": -0.1 } }"#).unwrap();
        assert!(matches!(config.validate(), Err(AnalysisError::InvalidConfig(_))));
        let mut config = AnalysisConfig::default();
        config.onset.wait = f64::INFINITY;
        assert!(config.validate().is_err());
        config.onset.wait = 0.03;
        config.onset.delta = f64::NAN;
        assert!(config.validate().is_err());
        config.onset.delta = 0.07;
        config.onset.post_avg = f64::INFINITY;
        assert!(config.validate().is_err());

        // long but finite windows are allowed
        let config: AnalysisConfig = serde_json::from_str(r#"{ "onset": { "post_avg": 1e300 } }"#).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_reads_file_or_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert_eq!(AnalysisConfig::load(&missing).unwrap(), AnalysisConfig::default());

        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "pause": { "threshold_ratio": 0.25 } }"#).unwrap();
        assert_eq!(AnalysisConfig::load(&path).unwrap().pause.threshold_ratio, 0.25);

        std::fs::write(&path, "not json").unwrap();
        assert!(AnalysisConfig::load(&path).is_err());
    }
}
