/// File: window.rs
///
/// This file contains window definitions.

use std::f64::consts::PI;
use serde::{Deserialize, Serialize};

/// Represents a window type
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowType {
    Blackman,
    Hanning,
    Hamming,
    Rectangular
}

impl Default for WindowType {
    fn default() -> Self {
        WindowType::Hanning
    }
}

/// Creates a Blackman window of size m
#[inline(always)]
pub fn generate_window_blackman(window_length: usize) -> Vec<f64>{
    let mut window: Vec<f64> = vec![0.0; window_length];
    for i in 0..window_length {
        window[i] = 0.42 - 0.5 * f64::cos((2.0 * PI * i as f64) / (window_length as f64))
            + 0.08 * f64::cos((4.0 * PI * i as f64) / (window_length as f64));
    }
    window
}

/// Creates a Hanning window of size m
#[inline(always)]
pub fn generate_window_hanning(window_length: usize) -> Vec<f64>{
    if window_length < 2 {
        return generate_window_rectangular(window_length);
    }
    let mut window: Vec<f64> = vec![0.0; window_length];
    for i in 0..window_length {
        window[i] = 0.5 - 0.5 * f64::cos((2.0 * PI * i as f64) / (window_length as f64 - 1.0));
    }
    window
}

/// Creates a Hamming window of size m
#[inline(always)]
pub fn generate_window_hamming(window_length: usize) -> Vec<f64>{
    if window_length < 2 {
        return generate_window_rectangular(window_length);
    }
    let mut window: Vec<f64> = vec![0.0; window_length];
    for i in 0..window_length {
        window[i] = 0.54 - 0.46 * f64::cos((2.0 * PI * i as f64) / (window_length as f64 - 1.0));
    }
    window
}

/// Creates a rectangular window of size m
#[inline(always)]
pub fn generate_window_rectangular(window_length: usize) -> Vec<f64>{
    vec![1.0; window_length]
}

/// Gets the corresponding window for a provided WindowType and window size
#[inline(always)]
pub fn generate_window(window_type: WindowType, window_length: usize) -> Vec<f64> {
    match &window_type {
        WindowType::Blackman => generate_window_blackman(window_length),
        WindowType::Hanning => generate_window_hanning(window_length),
        WindowType::Hamming => generate_window_hamming(window_length),
        WindowType::Rectangular => generate_window_rectangular(window_length),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn hanning_endpoints() {
        let window = generate_window(WindowType::Hanning, 9);
        assert!(window[0].abs() < 1e-12);
        assert!((window[4] - 1.0).abs() < 1e-12);
        assert!(window[8].abs() < 1e-12);
    }

    #[test]
    fn single_sample_windows_are_finite() {
        assert_eq!(generate_window(WindowType::Hamming, 1), vec![1.0]);
        assert_eq!(generate_window(WindowType::Hanning, 1), vec![1.0]);
    }
}
