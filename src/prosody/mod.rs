//! # Prosody
//! The four independent analyzers. Tonality, pace and pausing score every segment
//! on its own; voice character is computed once over the whole clip.
//! None of them reads another's output.

pub mod pace;
pub mod pause;
pub mod tonality;
pub mod voice;

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
