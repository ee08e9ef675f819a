/// File: mod.rs
/// This file stitches the spectrum module together

mod fft;
mod resample;
mod window;

pub use fft::*;
pub use resample::*;
pub use window::*;
