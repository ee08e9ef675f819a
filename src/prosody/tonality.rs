// File: tonality.rs
// This file contains the tonality (pitch variability) analyzer.
//
// Scores are segment-local: each segment's pitch is compared with that same
// segment's median, in octaves, so the score does not depend on the speaker's
// register or on any other segment.

use log::debug;
use crate::analysis::PitchFrame;
use crate::config::TonalityConfig;
use crate::dsp::DspBackend;
use crate::error::AnalysisError;
use crate::segment::{Segment, Segmentation};

/// A retained pitch: the strongest estimate of a frame, inside the vocal range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchCandidate {
    pub frame: usize,
    pub frequency: f64,
}

/// Keeps the strongest estimate of each frame when it lies strictly inside the vocal range.
/// Weaker estimates are never promoted, even if the strongest one falls outside the range.
pub fn vocal_candidates(frames: &[PitchFrame], config: &TonalityConfig) -> Vec<PitchCandidate> {
    let mut candidates: Vec<PitchCandidate> = Vec::with_capacity(frames.len());
    for (frame_idx, frame) in frames.iter().enumerate() {
        if let Some(estimate) = frame.strongest() {
            if estimate.frequency > config.min_frequency && estimate.frequency < config.max_frequency {
                candidates.push(PitchCandidate { frame: frame_idx, frequency: estimate.frequency });
            }
        }
    }
    candidates
}

/// Median of sorted values; the mean of the middle pair for even counts.
fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        0.5 * (sorted[n / 2 - 1] + sorted[n / 2])
    }
}

/// Percentile `q` (0-100) of sorted values with linear interpolation between ranks.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = usize::min(lo + 1, sorted.len() - 1);
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

/// Population standard deviation.
fn std_dev(values: &[f64]) -> f64 {
    let mean = super::mean(values);
    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

fn sort(values: &mut [f64]) {
    values.sort_unstable_by(|a, b| {
        match a.partial_cmp(b) {
            Some(x) => x,
            None => std::cmp::Ordering::Equal
        }
    });
}

/// Scores the variability of a set of pitch frequencies on the 0..=max_score scale.
///
/// Deviations are taken in octaves from the median; the score blends their
/// standard deviation with their inter-percentile range. Fewer than
/// `min_candidates` frequencies score 0.
pub fn variability_score(frequencies: &[f64], config: &TonalityConfig) -> f64 {
    if frequencies.is_empty() || frequencies.len() < config.min_candidates {
        return 0.0;
    }

    let mut octaves: Vec<f64> = frequencies.iter().map(|f| f.log2()).collect();
    sort(&mut octaves);
    let baseline = median(&octaves);

    let mut deviations: Vec<f64> = octaves.iter().map(|x| (x - baseline).abs()).collect();
    sort(&mut deviations);
    let variability = std_dev(&deviations);
    let range = percentile(&deviations, config.upper_percentile) - percentile(&deviations, config.lower_percentile);

    let energy = config.variability_weight * variability + config.range_weight * range;
    (energy * config.scale).clamp(0.0, config.max_score)
}

/// Scores one non-degenerate segment.
pub fn score_segment<B: DspBackend + ?Sized>(segment: &Segment, config: &TonalityConfig, backend: &B) -> Result<f64, AnalysisError> {
    if segment.duration() < config.min_segment_duration {
        debug!("tonality: segment {} too short ({:.3} s)", segment.index, segment.duration());
        return Ok(0.0);
    }
    let frames = backend.pitch_track(segment.samples, segment.sample_rate)?;
    let candidates = vocal_candidates(&frames, config);
    let frequencies: Vec<f64> = candidates.iter().map(|c| c.frequency).collect();
    let score = variability_score(&frequencies, config);
    debug!("tonality: segment {} has {} of {} frames voiced, score {:.2}", segment.index, candidates.len(), frames.len(), score);
    Ok(score)
}

/// Scores every segment.
pub fn analyze<B: DspBackend + ?Sized>(segmentation: &Segmentation, config: &TonalityConfig, backend: &B) -> Result<Vec<f64>, AnalysisError> {
    segmentation.score_each(|segment| score_segment(segment, config, backend))
}
