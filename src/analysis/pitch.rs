// File: pitch.rs
//
// This file contains the spectral-peak pitch tracker. For every STFT frame it
// reports each local magnitude peak in the search band, refined by parabolic
// interpolation, together with its interpolated magnitude as the salience.

/// A pitch estimate for one analysis frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchEstimate {
    pub frequency: f64,
    pub salience: f64,
}

/// All pitch estimates reported for one analysis frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PitchFrame {
    pub estimates: Vec<PitchEstimate>,
}

impl PitchFrame {
    /// The estimate with the highest salience, if the frame has any.
    pub fn strongest(&self) -> Option<PitchEstimate> {
        let mut best: Option<PitchEstimate> = None;
        for estimate in self.estimates.iter() {
            match best {
                Some(b) if b.salience >= estimate.salience => (),
                _ => best = Some(*estimate),
            }
        }
        best
    }
}

/// Tracks pitch candidates from a magnitude spectrogram.
///
/// A bin is a candidate when its frequency lies in `[f_min, f_max)`, it is a local
/// maximum (strictly above the bin below, at least the bin above) and its magnitude
/// exceeds `threshold` times the largest magnitude in the frame.
pub fn spectral_peak_pitches(magnitude_spectrogram: &[Vec<f64>], rfft_freqs: &[f64], f_min: f64, f_max: f64, threshold: f64) -> Vec<PitchFrame> {
    let bin_width = if rfft_freqs.len() > 1 { rfft_freqs[1] } else { 0.0 };
    let mut frames: Vec<PitchFrame> = Vec::with_capacity(magnitude_spectrogram.len());

    for spectrum in magnitude_spectrogram.iter() {
        let mut frame = PitchFrame::default();
        let frame_max = spectrum.iter().cloned().fold(0.0, f64::max);
        let floor = threshold * frame_max;

        for k in 1..spectrum.len().saturating_sub(1) {
            if rfft_freqs[k] < f_min || rfft_freqs[k] >= f_max {
                continue;
            }
            let (below, peak, above) = (spectrum[k - 1], spectrum[k], spectrum[k + 1]);
            if !(peak > below && peak >= above && peak > floor) {
                continue;
            }

            // parabolic interpolation around the peak bin
            let avg = 0.5 * (above - below);
            let curvature = 2.0 * peak - above - below;
            let shift = if curvature.abs() > f64::EPSILON { avg / curvature } else { 0.0 };
            frame.estimates.push(PitchEstimate {
                frequency: rfft_freqs[k] + shift * bin_width,
                salience: peak + 0.5 * avg * shift,
            });
        }
        frames.push(frame);
    }
    frames
}
