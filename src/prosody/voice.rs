// File: voice.rs
// This file contains the voice character analyzer.
//
// The mean spectral centroid of the clip is placed on a linear scale between
// two anchors: a dark, bass-heavy voice scores toward masculine and a bright one
// toward feminine. This is a calibrated brightness heuristic, not a biometric
// classifier, and callers should present it as such.

use log::debug;
use serde::{Deserialize, Serialize};
use crate::config::VoiceConfig;
use crate::dsp::DspBackend;
use crate::error::AnalysisError;
use crate::segment::Waveform;
use crate::spectrum::resample;
use super::mean;

/// Masculinity quantum; multiples of it subtract from 100 without rounding.
const PERCENT_QUANTUM: f64 = 1024.0;

/// Masculinity/femininity split in percent. The two values always sum to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceCharacter {
    pub masculinity_percentage: f64,
    pub femininity_percentage: f64,
}

impl VoiceCharacter {
    /// The 50/50 split reported when there is no audio to measure.
    pub fn neutral() -> VoiceCharacter {
        VoiceCharacter::from_masculinity(50.0)
    }

    fn from_masculinity(masculinity: f64) -> VoiceCharacter {
        let masculinity = (masculinity.clamp(0.0, 100.0) * PERCENT_QUANTUM).round() / PERCENT_QUANTUM;
        VoiceCharacter {
            masculinity_percentage: masculinity,
            femininity_percentage: 100.0 - masculinity,
        }
    }
}

/// Maps a mean spectral centroid onto the voice character scale.
///
/// The masculine anchor scores 100% masculine, the feminine anchor 0%, with
/// linear interpolation between them and clipping outside.
pub fn voice_character_from_centroid(mean_centroid: f64, config: &VoiceConfig) -> VoiceCharacter {
    let span = config.feminine_anchor - config.masculine_anchor;
    let masculinity = (config.feminine_anchor - mean_centroid) / span * 100.0;
    if masculinity.is_nan() {
        return VoiceCharacter::neutral();
    }
    VoiceCharacter::from_masculinity(masculinity)
}

/// Analyzes the whole clip. The centroid sequence is resampled to `segments`
/// points before averaging so it shares the other series' cardinality.
pub fn analyze<B: DspBackend + ?Sized>(waveform: &Waveform, segments: usize, config: &VoiceConfig, backend: &B) -> Result<VoiceCharacter, AnalysisError> {
    if waveform.samples.is_empty() {
        return Ok(VoiceCharacter::neutral());
    }
    let centroids = backend.spectral_centroid(&waveform.samples, waveform.sample_rate)?;
    if centroids.is_empty() {
        return Ok(VoiceCharacter::neutral());
    }
    let resampled = resample(&centroids, segments);
    let mean_centroid = mean(&resampled);
    let character = voice_character_from_centroid(mean_centroid, config);
    debug!("voice: mean centroid {:.1} Hz over {} frames, {:.1}% masculine", mean_centroid, centroids.len(), character.masculinity_percentage);
    Ok(character)
}
