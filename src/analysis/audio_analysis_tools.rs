// File: audio_analysis_tools.rs
//
// This file contains time-domain tools: the frame-wise RMS envelope, frame
// timing, and the pYIN pitch tracker wrapper.

use std::panic::{self, AssertUnwindSafe};
use log::warn;
use crate::error::AnalysisError;
use crate::spectrum::{frame_signal, SpectrumError};
use super::pitch::{PitchEstimate, PitchFrame};

/// Extracts the RMS energy of the signal.
/// (Eyben, pp. 21-22)
pub fn energy(audio: &[f64]) -> f64 {
    let mut sumsquare: f64 = 0.0;
    for i in 0..audio.len() {
        sumsquare += audio[i].powf(2.0);
    }
    if audio.len() < 1 {
        return 0.0;
    } else {
        return f64::sqrt(1.0 / audio.len() as f64 * sumsquare);
    }
}

/// Computes the RMS energy of each centred frame of the audio.
/// There is one value per frame, `1 + audio.len() / hop_size` values in total.
pub fn rms_frames(audio: &[f64], frame_length: usize, hop_size: usize) -> Result<Vec<f64>, SpectrumError> {
    let frames = frame_signal(audio, frame_length, hop_size, true)?;
    Ok(frames.iter().map(|frame| energy(frame)).collect())
}

/// Converts frame indices to times in seconds, given the hop between frames.
pub fn frames_to_time(frames: &[usize], sample_rate: u32, hop_size: usize) -> Vec<f64> {
    frames
        .iter()
        .map(|&frame| (frame * hop_size) as f64 / sample_rate as f64)
        .collect()
}

/// Performs pYIN pitch estimation.
/// Returns one `PitchFrame` per analysis frame. Voiced frames carry a single
/// estimate whose salience is the voiced probability; unvoiced frames are empty.
pub fn pyin_pitch_track(audio: &[f64], sample_rate: u32, f_min: f64, f_max: f64, frame_length: usize, hop_size: usize) -> Result<Vec<PitchFrame>, AnalysisError> {
    let resolution = 0.1;
    let fill_unvoiced = f64::NAN;
    let framing = pyin::Framing::Center::<f64>(pyin::PadMode::<f64>::Constant(0.0));

    // the pyin crate panics inside its realfft calls on some inputs, so the panic is turned into an error
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut executor = pyin::PYINExecutor::<f64>::new(f_min, f_max, sample_rate, frame_length, None, Some(hop_size), Some(resolution));
        executor.pyin(audio, fill_unvoiced, framing)
    }));
    let (f0, voiced, probs) = match result {
        Ok((_timestamps, f0, voiced, probs)) => (f0.to_vec(), voiced.to_vec(), probs.to_vec()),
        Err(payload) => {
            let msg = if let Some(msg) = payload.downcast_ref::<&str>() {
                msg.to_string()
            } else if let Some(msg) = payload.downcast_ref::<String>() {
                msg.clone()
            } else {
                String::from("pYIN panicked")
            };
            warn!("pYIN failed on {} samples: {}", audio.len(), msg);
            return Err(AnalysisError::PitchTracker(msg));
        }
    };

    let mut frames: Vec<PitchFrame> = Vec::with_capacity(f0.len());
    for i in 0..f0.len() {
        let mut frame = PitchFrame::default();
        if voiced[i] && !f0[i].is_nan() {
            frame.estimates.push(PitchEstimate { frequency: f0[i], salience: probs[i] });
        }
        frames.push(frame);
    }
    Ok(frames)
}
