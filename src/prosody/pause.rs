// File: pause.rs
// This file contains the pause analyzer.
//
// A frame is silent when its RMS falls below a fraction of the segment's own
// mean RMS. Consecutive silent frames form a pause; the segment's score is the
// mean pause length in seconds.

use log::debug;
use crate::config::PauseConfig;
use crate::dsp::DspBackend;
use crate::error::AnalysisError;
use crate::segment::{Segment, Segmentation};
use super::mean;

/// Pause tracking state while walking the envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PauseState {
    Speaking,
    Paused { length: f64 },
}

/// Finds the length in seconds of every silent run in an RMS envelope.
///
/// `frame_times` gives the time of each frame; the spacing of the first two is
/// the duration of one frame. A run still open at the end of the envelope is
/// closed and recorded.
pub fn pause_durations(rms: &[f64], frame_times: &[f64], config: &PauseConfig) -> Vec<f64> {
    let threshold = config.threshold_ratio * mean(rms);
    let dt = if frame_times.len() > 1 { frame_times[1] - frame_times[0] } else { config.fallback_frame_step };

    let mut pauses: Vec<f64> = Vec::new();
    let mut state = PauseState::Speaking;
    for &level in rms.iter() {
        let silent = level < threshold || level <= config.silence_floor;
        state = match (state, silent) {
            (PauseState::Speaking, true) => PauseState::Paused { length: dt },
            (PauseState::Paused { length }, true) => PauseState::Paused { length: length + dt },
            (PauseState::Paused { length }, false) => {
                if length > 0.0 {
                    pauses.push(length);
                }
                PauseState::Speaking
            }
            (PauseState::Speaking, false) => PauseState::Speaking,
        };
    }
    if let PauseState::Paused { length } = state {
        if length > 0.0 {
            pauses.push(length);
        }
    }
    pauses
}

/// Scores one non-degenerate segment.
pub fn score_segment<B: DspBackend + ?Sized>(segment: &Segment, config: &PauseConfig, backend: &B) -> Result<f64, AnalysisError> {
    let rms = backend.rms_envelope(segment.samples)?;
    if rms.is_empty() {
        return Ok(0.0);
    }
    let times = backend.frame_times(&rms, segment.sample_rate);
    let pauses = pause_durations(&rms, &times, config);
    let score = mean(&pauses);
    debug!("pause: segment {} has {} pauses, mean {:.3} s", segment.index, pauses.len(), score);
    Ok(score)
}

/// Scores every segment.
pub fn analyze<B: DspBackend + ?Sized>(segmentation: &Segmentation, config: &PauseConfig, backend: &B) -> Result<Vec<f64>, AnalysisError> {
    segmentation.score_each(|segment| score_segment(segment, config, backend))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dsp::fake::ScriptedBackend;
    use crate::dsp::SpectralBackend;
    use crate::segment::Waveform;

    fn times(n: usize, dt: f64) -> Vec<f64> {
        (0..n).map(|i| i as f64 * dt).collect()
    }

    #[test]
    fn runs_are_closed_by_speech_and_at_the_end() {
        let rms = [1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let pauses = pause_durations(&rms, &times(rms.len(), 0.01), &PauseConfig::default());
        assert_eq!(pauses.len(), 3);
        assert!((pauses[0] - 0.02).abs() < 1e-12);
        assert!((pauses[1] - 0.03).abs() < 1e-12);
        assert!((pauses[2] - 0.01).abs() < 1e-12);
    }

    #[test]
    /// A steady level never drops below half its own mean.
    fn steady_level_has_no_pauses() {
        let rms = [0.3; 12];
        assert!(pause_durations(&rms, &times(12, 0.02), &PauseConfig::default()).is_empty());
    }

    #[test]
    fn single_frame_uses_fallback_step() {
        let pauses = pause_durations(&[0.0], &[0.0], &PauseConfig::default());
        assert_eq!(pauses, vec![0.01]);
    }

    #[test]
    fn scripted_envelope_scores_mean_pause() {
        let waveform = Waveform::new(vec![0.0; 1000], 1000);
        let segmentation = Segmentation::new(&waveform, 1).unwrap();
        let backend = ScriptedBackend {
            rms: vec![0.8, 0.0, 0.0, 0.9, 0.0, 0.0, 0.0, 0.0, 0.7],
            frame_step: 0.05,
            ..ScriptedBackend::default()
        };
        let scores = analyze(&segmentation, &PauseConfig::default(), &backend).unwrap();
        assert!((scores[0] - 0.15).abs() < 1e-12);
    }

    #[test]
    /// Digital silence is one pause spanning the whole segment.
    fn silence_is_one_long_pause() {
        let sample_rate = 16000;
        let waveform = Waveform::new(vec![0.0; sample_rate as usize * 2], sample_rate);
        let segmentation = Segmentation::new(&waveform, 2).unwrap();
        let backend = SpectralBackend::default();
        let scores = analyze(&segmentation, &PauseConfig::default(), &backend).unwrap();
        let hop = 512.0 / sample_rate as f64;
        for score in scores {
            assert!((score - 1.0).abs() <= hop + 1e-9, "score {}", score);
        }
    }
}
