//! FFT-accelerated autocorrelation
//!
//! Uses the identity `ACF = IFFT(|FFT(signal)|²)` with zero-padding to at least twice the
//! signal length, so the result is the linear (not circular) autocorrelation.
//!
//! # Reference
//!
//! Ellis, D. P. W., & Pikrakis, A. (2006). Real-time Beat Induction.
//! *Proceedings of the International Conference on Music Information Retrieval*.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Compute the autocorrelation of `signal` for lags `0..signal.len()`
///
/// Negative correlation values are clamped to zero; callers only search for positive
/// periodicity peaks.
pub fn autocorrelation_fft(signal: &[f32]) -> Vec<f32> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }

    let fft_size = (2 * n).next_power_of_two();

    let mut spectrum: Vec<Complex<f32>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
    spectrum.resize(fft_size, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);
    fft.process(&mut spectrum);

    for x in &mut spectrum {
        *x = *x * x.conj();
    }

    let ifft = planner.plan_fft_inverse(fft_size);
    ifft.process(&mut spectrum);

    let scale = 1.0 / fft_size as f32;
    spectrum[..n]
        .iter()
        .map(|x| (x.re * scale).max(0.0))
        .collect()
}
