// File: pace.rs
// This file contains the pace analyzer.
//
// Pace is the number of detected onsets per minute of segment audio. Onsets
// are bursts of rhythmic energy, so this is a syllable-rate proxy rather than
// a transcript-derived word rate.

use log::debug;
use crate::dsp::DspBackend;
use crate::error::AnalysisError;
use crate::segment::{Segment, Segmentation};

/// Onsets per minute over a span of `duration` seconds; 0 for an empty span.
pub fn events_per_minute(onset_count: usize, duration: f64) -> f64 {
    if duration <= 0.0 {
        return 0.0;
    }
    onset_count as f64 * 60.0 / duration
}

/// Scores one non-degenerate segment.
pub fn score_segment<B: DspBackend + ?Sized>(segment: &Segment, backend: &B) -> Result<f64, AnalysisError> {
    let envelope = backend.onset_strength(segment.samples, segment.sample_rate)?;
    let onset_frames = backend.onset_detect(&envelope, segment.sample_rate)?;
    let onset_times = backend.frames_to_time(&onset_frames, segment.sample_rate);
    let pace = events_per_minute(onset_times.len(), segment.duration());
    debug!("pace: segment {} has {} onsets in {:.3} s, {:.1}/min", segment.index, onset_times.len(), segment.duration(), pace);
    Ok(pace)
}

/// Scores every segment.
pub fn analyze<B: DspBackend + ?Sized>(segmentation: &Segmentation, backend: &B) -> Result<Vec<f64>, AnalysisError> {
    segmentation.score_each(|segment| score_segment(segment, backend))
}
