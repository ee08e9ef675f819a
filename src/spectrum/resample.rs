/// File: resample.rs
///
/// This file contains Fourier-domain resampling of a real series.

use rustfft::{FftPlanner, num_complex::Complex};

/// Resamples a real series to `num` points in the frequency domain.
///
/// The series is treated as one period of a periodic signal: its spectrum is
/// truncated (or zero-extended) to `num` bins and inverse transformed. The
/// Nyquist bin is split or folded when its counterpart falls off either side,
/// so the DC bin, and therefore the mean of the series, is preserved exactly
/// up to rounding.
///
/// An empty input or `num == 0` gives an empty output.
pub fn resample(series: &[f64], num: usize) -> Vec<f64> {
    let n_in = series.len();
    if n_in == 0 || num == 0 {
        return Vec::new();
    }

    let mut planner: FftPlanner<f64> = FftPlanner::new();
    let fft = planner.plan_fft_forward(n_in);
    let ifft = planner.plan_fft_inverse(num);

    let mut spectrum: Vec<Complex<f64>> = series.iter().map(|&x| Complex{re: x, im: 0.0}).collect();
    fft.process(&mut spectrum);

    // Half spectrum of the output, as an rFFT of length num would hold it
    let n_keep = usize::min(num, n_in);
    let mut half: Vec<Complex<f64>> = vec![Complex{re: 0.0, im: 0.0}; num / 2 + 1];
    for k in 0..usize::min(n_keep / 2 + 1, half.len()) {
        half[k] = spectrum[k];
    }
    if n_keep % 2 == 0 && n_keep / 2 < half.len() {
        if num < n_in {
            half[n_keep / 2] = half[n_keep / 2] * 2.0;
        } else if n_in < num {
            half[n_keep / 2] = half[n_keep / 2] * 0.5;
        }
    }

    // Rebuild the full Hermitian spectrum of length num
    let mut full: Vec<Complex<f64>> = vec![Complex{re: 0.0, im: 0.0}; num];
    full[0] = Complex{re: half[0].re, im: 0.0};
    for k in 1..half.len() {
        if 2 * k == num {
            full[k] = Complex{re: half[k].re, im: 0.0};
        } else {
            full[k] = half[k];
            full[num - k] = half[k].conj();
        }
    }
    ifft.process(&mut full);

    // rustfft does not normalize; 1/num from the inverse times num/n_in
    full.iter().map(|bin| bin.re / n_in as f64).collect()
}
