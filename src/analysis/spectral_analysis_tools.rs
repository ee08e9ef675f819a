// File: spectral_analysis_tools.rs
//
// This file contains functionality for computing spectral features.
//
// The spectral centroid follows the formula provided in
// Florian Eyben, "Real-Time Speech and Music Classification by Large Audio Feature Space Extraction," Springer, 2016.

use crate::spectrum::{magnitude_spectrogram, rfftfreq, rstft, SpectrumError, WindowType};

/// Computes the dot product of two vectors
#[inline(always)]
pub fn dot_product(vec1: &[f64], vec2: &[f64]) -> f64 {
    let mut sum: f64 = 0.0;
    let end = usize::min(vec1.len(), vec2.len());
    for i in 0..end {
        sum += vec1[i] * vec2[i];
    }
    sum
}

/// Calculates the spectral centroid from provided magnitude spectrum.
/// A spectrum with no energy has a centroid of 0.
/// (Eyben, pp. 39-40)
pub fn spectral_centroid(magnitude_spectrum: &[f64], rfft_freqs: &[f64]) -> f64 {
    let magnitude_spectrum_sum: f64 = magnitude_spectrum.iter().sum();
    if magnitude_spectrum_sum == 0.0 {
        return 0.0;
    }
    dot_product(magnitude_spectrum, rfft_freqs) / magnitude_spectrum_sum
}

/// Calculates the spectral centroid of every centred STFT frame of the audio.
pub fn spectral_centroid_frames(audio: &[f64], sample_rate: u32, fft_size: usize, hop_size: usize, window_type: WindowType) -> Result<Vec<f64>, SpectrumError> {
    let spectrogram = rstft(audio, fft_size, hop_size, window_type, true)?;
    let rfft_freqs = rfftfreq(fft_size, sample_rate);
    Ok(magnitude_spectrogram(&spectrogram)
        .iter()
        .map(|frame| spectral_centroid(frame, &rfft_freqs))
        .collect())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn centroid_is_magnitude_weighted_mean() {
        let freqs = vec![0.0, 100.0, 200.0, 300.0];
        assert!((spectral_centroid(&[0.0, 1.0, 0.0, 1.0], &freqs) - 200.0).abs() < 1e-12);
        assert_eq!(spectral_centroid(&[0.0; 4], &freqs), 0.0);
    }

    #[test]
    /// A pure tone's centroid sits close to the tone.
    fn sine_centroid() {
        let sample_rate = 16000;
        let audio: Vec<f64> = (0..16000)
            .map(|n| (2.0 * std::f64::consts::PI * 2000.0 * n as f64 / sample_rate as f64).sin())
            .collect();
        let centroids = spectral_centroid_frames(&audio, sample_rate, 2048, 512, WindowType::Hanning).unwrap();
        assert_eq!(centroids.len(), 1 + 16000 / 512);
        let middle = centroids[centroids.len() / 2];
        assert!((middle - 2000.0).abs() < 50.0);
    }
}
