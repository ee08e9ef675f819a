//! # Analysis
//! The `analysis` module contains the frame-wise DSP primitives the prosody analyzers consume:
//! RMS envelopes, pitch tracking, onset strength and onset picking, and the spectral centroid.
//! Some analysis tools are based on formulas from Florian Eyben, "Real-Time Speech and Music Classification," Springer, 2016.

mod audio_analysis_tools;
mod onset;
mod pitch;
mod spectral_analysis_tools;

#[doc(inline)]
pub use audio_analysis_tools::*;
#[doc(inline)]
pub use onset::*;
#[doc(inline)]
pub use pitch::*;
#[doc(inline)]
pub use spectral_analysis_tools::{dot_product, spectral_centroid, spectral_centroid_frames};
