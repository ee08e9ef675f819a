// File: segment.rs
// This file contains the waveform type and the segmenter that splits it into
// equal-width analysis windows.

use log::debug;
use crate::error::AnalysisError;

/// A decoded mono recording. Samples are always stored in f64 format.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    pub samples: Vec<f64>,
    pub sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Waveform {
        Waveform { samples, sample_rate }
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// One of the N equal-width windows of a waveform.
#[derive(Debug, Clone, Copy)]
pub struct Segment<'a> {
    pub index: usize,
    pub start: usize,
    pub end: usize,
    pub samples: &'a [f64],
    pub sample_rate: u32,
}

impl<'a> Segment<'a> {
    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// A segment with no samples carries no evidence and scores 0 in every analyzer.
    pub fn is_degenerate(&self) -> bool {
        self.samples.is_empty() || self.duration() <= 0.0
    }
}

/// A waveform split into N contiguous, equal-length, non-overlapping segments.
///
/// Segment `i` spans samples `[i * len / N, (i + 1) * len / N)` with integer division
/// of the length, so the remainder after the last full segment is dropped. When
/// the waveform has fewer than N samples every segment is empty.
#[derive(Debug, Clone)]
pub struct Segmentation<'a> {
    waveform: &'a Waveform,
    segment_length: usize,
    count: usize,
}

impl<'a> Segmentation<'a> {
    pub fn new(waveform: &'a Waveform, count: usize) -> Result<Segmentation<'a>, AnalysisError> {
        if count == 0 {
            return Err(AnalysisError::InvalidSegmentCount(count));
        }
        if waveform.sample_rate == 0 {
            return Err(AnalysisError::InvalidSampleRate);
        }
        let segment_length = waveform.samples.len() / count;
        debug!("{} samples split into {} segments of {} samples", waveform.samples.len(), count, segment_length);
        Ok(Segmentation { waveform, segment_length, count })
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn segment_length(&self) -> usize {
        self.segment_length
    }

    pub fn get(&self, index: usize) -> Option<Segment<'a>> {
        if index >= self.count {
            return None;
        }
        let start = index * self.segment_length;
        let end = start + self.segment_length;
        Some(Segment {
            index,
            start,
            end,
            samples: &self.waveform.samples[start..end],
            sample_rate: self.waveform.sample_rate,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Segment<'a>> + '_ {
        (0..self.count).filter_map(move |i| self.get(i))
    }

    /// The shared time axis: N points spaced linearly over [0, duration].
    pub fn time_axis(&self) -> Vec<f64> {
        time_axis(self.waveform.duration(), self.count)
    }

    /// Scores every segment, applying the degenerate segment policy once for all analyzers:
    /// degenerate segments score 0 and are never handed to `score`.
    pub fn score_each<F>(&self, mut score: F) -> Result<Vec<f64>, AnalysisError>
    where
        F: FnMut(&Segment<'a>) -> Result<f64, AnalysisError>,
    {
        let mut scores: Vec<f64> = Vec::with_capacity(self.count);
        for segment in self.iter() {
            scores.push(score_segment(&segment, &mut score)?);
        }
        Ok(scores)
    }
}

/// Applies the degenerate segment policy to a single segment.
pub fn score_segment<'a, F>(segment: &Segment<'a>, score: F) -> Result<f64, AnalysisError>
where
    F: FnOnce(&Segment<'a>) -> Result<f64, AnalysisError>,
{
    if segment.is_degenerate() {
        return Ok(0.0);
    }
    score(segment)
}

/// Computes `count` values linearly spaced over [0, duration], both ends included.
/// A single point is placed at 0.
pub fn time_axis(duration: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let step = duration / (count - 1) as f64;
            let mut axis: Vec<f64> = (0..count).map(|i| i as f64 * step).collect();
            axis[count - 1] = duration;
            axis
        }
    }
}
