// File: tests.rs
// This file contains end-to-end tests of the analysis on synthesized audio.

use std::f64::consts::PI;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::config::{AnalysisConfig, PitchMethod};
use crate::dsp::SpectralBackend;
use crate::pipeline::{analyze, analyze_default, AnalysisResult};
use crate::prosody::voice::VoiceCharacter;
use crate::segment::Waveform;

const SAMPLE_RATE: u32 = 16000;

fn sine(freq: f64, seconds: f64, amplitude: f64) -> Vec<f64> {
    let len = (SAMPLE_RATE as f64 * seconds) as usize;
    (0..len).map(|n| amplitude * (2.0 * PI * freq * n as f64 / SAMPLE_RATE as f64).sin()).collect()
}

/// A tone switched on for the first 0.2 s of every half second
fn gated_bursts(freq: f64, seconds: f64) -> Vec<f64> {
    let mut audio = sine(freq, seconds, 0.5);
    for (n, sample) in audio.iter_mut().enumerate() {
        let t = n as f64 / SAMPLE_RATE as f64;
        if (t * 2.0).fract() >= 0.4 {
            *sample = 0.0;
        }
    }
    audio
}

fn noise(seconds: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let len = (SAMPLE_RATE as f64 * seconds) as usize;
    (0..len).map(|_| rng.gen_range(-0.3..0.3)).collect()
}

fn check_invariants(result: &AnalysisResult, segments: usize) {
    for series in [&result.tonality, &result.pace, &result.pausing] {
        assert_eq!(series.time.len(), segments);
        assert_eq!(series.data.len(), segments);
        assert_eq!(series.time, result.tonality.time);
        assert!(series.data.iter().all(|x| x.is_finite() && *x >= 0.0));
    }
    assert!(result.tonality.data.iter().all(|&x| x <= 100.0));
    let voice = result.vocal_characters;
    assert_eq!(voice.masculinity_percentage + voice.femininity_percentage, 100.0);
    assert!((0.0..=100.0).contains(&voice.masculinity_percentage));
}

#[test]
fn invariants_hold_on_noise() {
    let waveform = Waveform::new(noise(4.0, 7), SAMPLE_RATE);
    for segments in [1, 3, 5, 12] {
        let result = analyze_default(&waveform, segments).unwrap();
        check_invariants(&result, segments);
        assert_eq!(result.tonality.time[0], 0.0);
        assert_eq!(result.tonality.time[segments - 1], if segments == 1 { 0.0 } else { 4.0 });
    }
}

#[test]
/// Running twice on the same input gives the same result.
fn analysis_is_deterministic() {
    let waveform = Waveform::new(gated_bursts(180.0, 3.0), SAMPLE_RATE);
    let first = analyze_default(&waveform, 5).unwrap();
    let second = analyze_default(&waveform, 5).unwrap();
    assert_eq!(first, second);
}

#[test]
fn empty_waveform_scores_zero() {
    let waveform = Waveform::new(Vec::new(), SAMPLE_RATE);
    let result = analyze_default(&waveform, 5).unwrap();
    check_invariants(&result, 5);
    assert_eq!(result.tonality.time, vec![0.0; 5]);
    assert_eq!(result.tonality.data, vec![0.0; 5]);
    assert_eq!(result.pace.data, vec![0.0; 5]);
    assert_eq!(result.pausing.data, vec![0.0; 5]);
    assert_eq!(result.tonality.average, 0.0);
    assert_eq!(result.vocal_characters, VoiceCharacter::neutral());
}

#[test]
/// Digital silence is one pause spanning each segment, with no onsets and no pitch.
fn silence_is_one_long_pause() {
    let waveform = Waveform::new(vec![0.0; 2 * SAMPLE_RATE as usize], SAMPLE_RATE);
    let config = AnalysisConfig::default();
    let backend = SpectralBackend::new(config.clone());
    let result = analyze(&waveform, 2, &config, &backend).unwrap();
    check_invariants(&result, 2);
    let hop = config.frame.hop_length as f64 / SAMPLE_RATE as f64;
    for &pause in result.pausing.data.iter() {
        assert!((pause - 1.0).abs() <= hop, "pause {} should span the 1 s segment", pause);
    }
    assert_eq!(result.pace.data, vec![0.0; 2]);
    assert_eq!(result.tonality.data, vec![0.0; 2]);
}

#[test]
/// A steady tone has almost no pitch variability.
fn monotone_scores_low_tonality() {
    let waveform = Waveform::new(sine(200.0, 3.0, 0.5), SAMPLE_RATE);
    let result = analyze_default(&waveform, 3).unwrap();
    check_invariants(&result, 3);
    assert!(result.tonality.data.iter().all(|&x| x < 5.0), "{:?}", result.tonality.data);
}

#[test]
fn monotone_scores_low_tonality_with_pyin() {
    let waveform = Waveform::new(sine(200.0, 3.0, 0.5), SAMPLE_RATE);
    let mut config = AnalysisConfig::default();
    config.pitch.method = PitchMethod::Pyin;
    let backend = SpectralBackend::new(config.clone());
    let result = analyze(&waveform, 3, &config, &backend).unwrap();
    check_invariants(&result, 3);
    assert!(result.tonality.data.iter().all(|&x| x < 5.0), "{:?}", result.tonality.data);
}

#[test]
/// Audio sampled at 2 kHz is scored rather than rejected by the pitch tracker.
fn low_sample_rate_is_analyzed() {
    let sample_rate = 2000;
    let audio: Vec<f64> = (0..2400)
        .map(|n| 0.5 * (2.0 * PI * 200.0 * n as f64 / sample_rate as f64).sin())
        .collect();
    let waveform = Waveform::new(audio, sample_rate);
    for method in [PitchMethod::SpectralPeak, PitchMethod::Pyin] {
        let mut config = AnalysisConfig::default();
        config.pitch.method = method;
        let backend = SpectralBackend::new(config.clone());
        let result = analyze(&waveform, 1, &config, &backend).unwrap();
        check_invariants(&result, 1);
    }
}

#[test]
fn bursts_have_a_pace() {
    let waveform = Waveform::new(gated_bursts(180.0, 4.0), SAMPLE_RATE);
    let result = analyze_default(&waveform, 2).unwrap();
    check_invariants(&result, 2);
    assert!(result.pace.data.iter().all(|&x| x > 0.0), "{:?}", result.pace.data);
    assert!(result.pausing.average > 0.0);
}

#[test]
/// An onset window longer than the clip still analyzes.
fn long_onset_window() {
    let waveform = Waveform::new(gated_bursts(180.0, 2.0), SAMPLE_RATE);
    let mut config = AnalysisConfig::default();
    config.onset.post_avg = 1e300;
    let backend = SpectralBackend::new(config.clone());
    let result = analyze(&waveform, 2, &config, &backend).unwrap();
    check_invariants(&result, 2);
}

#[test]
/// A dark, low tone reads as more masculine than broadband noise.
fn low_tone_is_darker_than_noise() {
    let tone = analyze_default(&Waveform::new(sine(150.0, 2.0, 0.5), SAMPLE_RATE), 4).unwrap();
    let hiss = analyze_default(&Waveform::new(noise(2.0, 11), SAMPLE_RATE), 4).unwrap();
    assert_eq!(tone.vocal_characters.masculinity_percentage, 100.0);
    assert!(hiss.vocal_characters.masculinity_percentage < tone.vocal_characters.masculinity_percentage);
}

#[test]
/// The serialized result uses the response field names.
fn json_layout() {
    let waveform = Waveform::new(noise(1.0, 3), SAMPLE_RATE);
    let result = analyze_default(&waveform, 2).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    for key in ["tonality", "pace", "pausing"] {
        assert_eq!(json[key]["time"].as_array().map(|a| a.len()), Some(2));
        assert_eq!(json[key]["data"].as_array().map(|a| a.len()), Some(2));
        assert!(json[key]["average"].is_number());
    }
    assert!(json["vocalCharacters"]["masculinityPercentage"].is_number());
    assert!(json["vocalCharacters"]["femininityPercentage"].is_number());
}
