// File: pipeline.rs
// This file contains the analysis entry point and the aggregator that bundles
// the analyzers' outputs into one result.

use log::info;
use serde::{Deserialize, Serialize};
use crate::config::AnalysisConfig;
use crate::dsp::{DspBackend, SpectralBackend};
use crate::error::AnalysisError;
use crate::prosody::{mean, pace, pause, tonality, voice};
use crate::prosody::voice::VoiceCharacter;
use crate::segment::{Segmentation, Waveform};

/// One score per segment on the shared time axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub time: Vec<f64>,
    pub data: Vec<f64>,
    pub average: f64,
}

/// The complete prosody analysis of a recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub tonality: TimeSeries,
    pub pace: TimeSeries,
    pub pausing: TimeSeries,
    pub vocal_characters: VoiceCharacter,
}

/// Pairs a score array with the time axis after checking it has one value per segment.
fn time_series(series: &'static str, time: &[f64], data: Vec<f64>) -> Result<TimeSeries, AnalysisError> {
    if data.len() != time.len() {
        return Err(AnalysisError::ShapeMismatch { series, expected: time.len(), actual: data.len() });
    }
    let average = mean(&data);
    Ok(TimeSeries { time: time.to_vec(), data, average })
}

/// Bundles the per-segment scores and the voice character into an `AnalysisResult`.
pub fn aggregate(time: Vec<f64>, tonality: Vec<f64>, pace: Vec<f64>, pausing: Vec<f64>, vocal_characters: VoiceCharacter) -> Result<AnalysisResult, AnalysisError> {
    Ok(AnalysisResult {
        tonality: time_series("tonality", &time, tonality)?,
        pace: time_series("pace", &time, pace)?,
        pausing: time_series("pausing", &time, pausing)?,
        vocal_characters,
    })
}

/// Analyzes a waveform split into `segments` equal windows.
///
/// The result is a pure function of the inputs. Segments without enough
/// evidence score 0; errors are reserved for invalid arguments and failures of
/// the DSP backend.
///
/// # Example
///
/// ```
/// use prosody::{analyze, AnalysisConfig, SpectralBackend, Waveform};
/// let waveform = Waveform::new(vec![0.0; 16000], 16000);
/// let config = AnalysisConfig::default();
/// let backend = SpectralBackend::new(config.clone());
/// let result = analyze(&waveform, 4, &config, &backend).unwrap();
/// assert_eq!(result.tonality.data.len(), 4);
/// ```
pub fn analyze<B: DspBackend + ?Sized>(waveform: &Waveform, segments: usize, config: &AnalysisConfig, backend: &B) -> Result<AnalysisResult, AnalysisError> {
    config.validate()?;
    let segmentation = Segmentation::new(waveform, segments)?;
    info!("analyzing {:.2} s of audio at {} Hz in {} segments", waveform.duration(), waveform.sample_rate, segments);

    let tonality_scores = tonality::analyze(&segmentation, &config.tonality, backend)?;
    let pace_scores = pace::analyze(&segmentation, backend)?;
    let pause_scores = pause::analyze(&segmentation, &config.pause, backend)?;
    let vocal_characters = voice::analyze(waveform, segments, &config.voice, backend)?;

    aggregate(segmentation.time_axis(), tonality_scores, pace_scores, pause_scores, vocal_characters)
}

/// Analyzes a waveform with the default configuration and backend.
pub fn analyze_default(waveform: &Waveform, segments: usize) -> Result<AnalysisResult, AnalysisError> {
    let config = AnalysisConfig::default();
    let backend = SpectralBackend::new(config.clone());
    analyze(waveform, segments, &config, &backend)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dsp::fake::ScriptedBackend;

    #[test]
    fn aggregate_checks_shapes() {
        let time = vec![0.0, 1.0];
        let err = aggregate(time, vec![1.0, 2.0], vec![1.0], vec![0.0, 0.0], VoiceCharacter::neutral()).unwrap_err();
        assert!(matches!(err, AnalysisError::ShapeMismatch { series: "pace", expected: 2, actual: 1 }));
    }

    #[test]
    fn averages_are_means() {
        let result = aggregate(vec![0.0, 1.0, 2.0], vec![10.0, 20.0, 60.0], vec![0.0; 3], vec![1.0, 2.0, 3.0], VoiceCharacter::neutral()).unwrap();
        assert_eq!(result.tonality.average, 30.0);
        assert_eq!(result.pace.average, 0.0);
        assert_eq!(result.pausing.average, 2.0);
    }

    #[test]
    /// Every series shares the time axis and the serialized keys match the response format.
    fn scripted_analysis() {
        let waveform = Waveform::new(vec![0.1; 30000], 10000);
        let backend = ScriptedBackend {
            pitches: vec![180.0; 20],
            onsets: vec![1, 5, 9],
            rms: vec![1.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            frame_step: 0.1,
            centroids: vec![2500.0; 12],
            ..ScriptedBackend::default()
        };
        let result = analyze(&waveform, 3, &AnalysisConfig::default(), &backend).unwrap();
        assert_eq!(result.tonality.time, vec![0.0, 1.5, 3.0]);
        assert_eq!(result.pace.time, result.tonality.time);
        assert_eq!(result.tonality.data, vec![0.0; 3]);
        assert_eq!(result.pace.data, vec![180.0; 3]);
        assert!((result.pausing.data[0] - 0.15).abs() < 1e-12);
        assert_eq!(result.vocal_characters, VoiceCharacter::neutral());

        let json = serde_json::to_value(&result).unwrap();
        assert!(json["tonality"]["time"].is_array());
        assert!(json["pausing"]["average"].is_number());
        assert_eq!(json["vocalCharacters"]["femininityPercentage"], 50.0);
    }

    #[test]
    fn zero_segments_is_rejected() {
        let waveform = Waveform::new(vec![0.0; 100], 8000);
        assert!(matches!(analyze_default(&waveform, 0), Err(AnalysisError::InvalidSegmentCount(0))));
    }

    #[test]
    fn backend_errors_propagate() {
        let waveform = Waveform::new(vec![0.1; 30000], 10000);
        let backend = ScriptedBackend::failing();
        assert!(analyze(&waveform, 2, &AnalysisConfig::default(), &backend).is_err());
    }
}
