/// File: fft.rs
///
/// This file contains FFT abstraction functions based on the rustfft crate.
/// It has signal framing, a centred rSTFT for frame-wise analysis, and the
/// helpers that turn a complex spectrogram into magnitudes and bin frequencies.

use rustfft::{FftPlanner, num_complex::Complex};
use thiserror::Error;
use super::window::{WindowType, generate_window};

/// Represents all possible errors that could happen in spectrum processing
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpectrumError {
    #[error("the FFT size must be positive")]
    ZeroFftSize,
    #[error("the hop size must be positive")]
    ZeroHopSize,
}

/// Gets the corresponding frequencies for rFFT data
pub fn rfftfreq(fft_size: usize, sample_rate: u32) -> Vec<f64> {
    let mut freqs = vec![0.0 as f64; fft_size / 2 + 1];
    let f_0 = sample_rate as f64 / fft_size as f64;
    for i in 1..freqs.len() {
        freqs[i] = f_0 * i as f64;
    }
    freqs
}

/// Counts the frames `frame_signal` produces for `num_samples` samples.
pub fn frame_count(num_samples: usize, frame_length: usize, hop_size: usize, center: bool) -> usize {
    let padded_len = if center { num_samples + 2 * (frame_length / 2) } else { num_samples };
    if padded_len <= frame_length {
        1
    } else {
        1 + (padded_len - frame_length) / hop_size
    }
}

/// Cuts audio into overlapping frames of `frame_length` samples, `hop_size` apart.
///
/// If `center` is set, the audio is zero-padded by `frame_length / 2` samples at
/// each end so that frame `t` is centred on sample `t * hop_size`. Frames running
/// past the end of the (padded) audio are zero-padded, so every frame has exactly
/// `frame_length` samples.
pub fn frame_signal(audio: &[f64], frame_length: usize, hop_size: usize, center: bool) -> Result<Vec<Vec<f64>>, SpectrumError> {
    if frame_length == 0 {
        return Err(SpectrumError::ZeroFftSize);
    }
    if hop_size == 0 {
        return Err(SpectrumError::ZeroHopSize);
    }

    let pad = if center { frame_length / 2 } else { 0 };
    let num_frames = frame_count(audio.len(), frame_length, hop_size, center);
    let mut frames: Vec<Vec<f64>> = Vec::with_capacity(num_frames);
    for frame_idx in 0..num_frames {
        let mut frame = vec![0.0; frame_length];
        let start = frame_idx * hop_size;
        for i in 0..frame_length {
            // position in the unpadded audio
            let pos = start + i;
            if pos >= pad && pos - pad < audio.len() {
                frame[i] = audio[pos - pad];
            }
        }
        frames.push(frame);
    }
    Ok(frames)
}

/// Calculates the real STFT of a chunk of audio.
///
/// Each frame is windowed with the provided window type before the FFT. See
/// `frame_signal` for the framing and padding rules.
/// This function will return a vector of complex rFFT spectrum frames, each of
/// length `fft_size / 2 + 1`.
pub fn rstft(audio: &[f64], fft_size: usize, hop_size: usize, window_type: WindowType, center: bool) -> Result<Vec<Vec<Complex<f64>>>, SpectrumError> {
    let frames = frame_signal(audio, fft_size, hop_size, center)?;
    let mut planner: FftPlanner<f64> = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);
    let window = generate_window(window_type, fft_size);

    let mut spectrogram: Vec<Vec<Complex<f64>>> = Vec::with_capacity(frames.len());
    for frame in frames.iter() {
        let mut fft_data: Vec<Complex<f64>> = Vec::with_capacity(fft_size);
        for i in 0..fft_size {
            fft_data.push(Complex{re: frame[i] * window[i], im: 0.0});
        }
        fft.process(&mut fft_data);
        spectrogram.push(fft_data[..fft_size / 2 + 1].to_vec());
    }
    Ok(spectrogram)
}

/// Converts a complex spectrogram into a magnitude spectrogram.
pub fn magnitude_spectrogram(spectrogram: &[Vec<Complex<f64>>]) -> Vec<Vec<f64>> {
    spectrogram
        .iter()
        .map(|frame| frame.iter().map(|bin| bin.norm()).collect())
        .collect()
}
