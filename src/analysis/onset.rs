// File: onset.rs
//
// This file contains onset detection: a log-power spectral flux envelope and
// the peak picker that turns the envelope into discrete onset frames.

/// Power values below this are floored before conversion to decibels.
const POWER_EPSILON: f64 = 1e-10;

/// Dynamic range of the log-power spectrogram in dB.
const TOP_DB: f64 = 80.0;

/// Peak picking windows, in frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakPicking {
    pub pre_max: usize,
    pub post_max: usize,
    pub pre_avg: usize,
    pub post_avg: usize,
    pub delta: f64,
    pub wait: usize,
}

impl PeakPicking {
    /// Converts window lengths given in seconds into frames at the hop rate.
    /// The post windows gain one frame so that they always include the current frame.
    pub fn from_seconds(pre_max: f64, post_max: f64, pre_avg: f64, post_avg: f64, delta: f64, wait: f64, sample_rate: u32, hop_size: usize) -> PeakPicking {
        let frames_per_second = sample_rate as f64 / hop_size as f64;
        let to_frames = |seconds: f64| (seconds * frames_per_second).floor() as usize;
        PeakPicking {
            pre_max: to_frames(pre_max),
            post_max: to_frames(post_max).saturating_add(1),
            pre_avg: to_frames(pre_avg),
            post_avg: to_frames(post_avg).saturating_add(1),
            delta,
            wait: to_frames(wait),
        }
    }
}

/// Computes the onset strength envelope of a magnitude spectrogram.
///
/// The spectrogram is converted to log power with an 80 dB floor below its
/// peak; the envelope value of frame `t` is the mean over bins of the positive
/// increase from frame `t - 1`. The first frame has strength 0.
pub fn onset_strength(magnitude_spectrogram: &[Vec<f64>]) -> Vec<f64> {
    let mut log_power: Vec<Vec<f64>> = magnitude_spectrogram
        .iter()
        .map(|frame| frame.iter().map(|m| 10.0 * f64::max(m * m, POWER_EPSILON).log10()).collect())
        .collect();

    let peak_db = log_power
        .iter()
        .flat_map(|frame| frame.iter())
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);
    for frame in log_power.iter_mut() {
        for value in frame.iter_mut() {
            *value = f64::max(*value, peak_db - TOP_DB);
        }
    }

    let mut envelope = vec![0.0; log_power.len()];
    for t in 1..log_power.len() {
        let bins = log_power[t].len();
        if bins == 0 {
            continue;
        }
        let mut flux = 0.0;
        for k in 0..bins {
            flux += f64::max(0.0, log_power[t][k] - log_power[t - 1][k]);
        }
        envelope[t] = flux / bins as f64;
    }
    envelope
}

/// Shifts an envelope to start at 0 and scales its peak to 1.
/// A flat envelope becomes all zeros.
pub fn normalize_envelope(envelope: &[f64]) -> Vec<f64> {
    let min = envelope.iter().cloned().fold(f64::INFINITY, f64::min);
    let mut normalized: Vec<f64> = envelope.iter().map(|x| x - min).collect();
    let max = normalized.iter().cloned().fold(0.0, f64::max);
    if max > 0.0 {
        for value in normalized.iter_mut() {
            *value /= max;
        }
    }
    normalized
}

/// Picks peaks in a signal.
///
/// Frame `n` is a peak when all of these hold:
/// 1. `x[n] == max(x[n - pre_max .. n + post_max])`
/// 2. `x[n] >= mean(x[n - pre_avg .. n + post_avg]) + delta`
/// 3. more than `wait` frames have passed since the previous peak
pub fn peak_pick(x: &[f64], params: &PeakPicking) -> Vec<usize> {
    let mut peaks: Vec<usize> = Vec::new();
    let mut last_peak: Option<usize> = None;

    for n in 0..x.len() {
        let max_lo = n.saturating_sub(params.pre_max);
        let max_hi = usize::min(x.len(), n.saturating_add(usize::max(params.post_max, 1)));
        let local_max = x[max_lo..max_hi].iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if x[n] != local_max {
            continue;
        }

        let avg_lo = n.saturating_sub(params.pre_avg);
        let avg_hi = usize::min(x.len(), n.saturating_add(usize::max(params.post_avg, 1)));
        let local_mean = x[avg_lo..avg_hi].iter().sum::<f64>() / (avg_hi - avg_lo) as f64;
        if x[n] < local_mean + params.delta {
            continue;
        }

        if let Some(last) = last_peak {
            if n - last <= params.wait {
                continue;
            }
        }
        peaks.push(n);
        last_peak = Some(n);
    }
    peaks
}

/// Detects onset frames from an onset strength envelope.
pub fn onset_detect(envelope: &[f64], params: &PeakPicking) -> Vec<usize> {
    if envelope.is_empty() {
        return Vec::new();
    }
    peak_pick(&normalize_envelope(envelope), params)
}
