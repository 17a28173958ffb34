//! Spectral toolkit
//!
//! Shared primitives every analyzer builds on:
//! - Hann-windowed short-time magnitude spectra
//! - Per-band energy ratios
//! - Running frame energy
//! - FFT-accelerated autocorrelation
//! - Order statistics and line fitting

pub mod autocorrelation;
pub mod stats;
pub mod stft;

pub use autocorrelation::autocorrelation_fft;
pub use stft::{band_energy_ratio, frame_energies, hann_window, Spectrogram};

/// Numerical stability epsilon shared by the analyzers
pub const EPSILON: f32 = 1e-10;
