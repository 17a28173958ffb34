//! Loudness measurement (ITU-R BS.1770-4)
//!
//! Integrated loudness uses the two-stage K-weighting pre-filter, 400 ms blocks with 75%
//! overlap, an absolute gate at -70 LUFS and a relative gate 10 LU below the absolutely
//! gated mean. Short-term loudness is the 90th percentile of 3 s windows at a 1.5 s hop.
//!
//! # Reference
//!
//! ITU-R BS.1770-4 (2015). Algorithms to measure audio programme loudness and true-peak
//! audio level. International Telecommunication Union.

use crate::analysis::result::LoudnessMetrics;
use crate::error::AnalysisError;
use crate::features::spectral::{stats::percentile, EPSILON};

/// Absolute gate (LUFS)
const ABSOLUTE_GATE_LUFS: f64 = -70.0;

/// Relative gate offset (LU below the absolutely gated loudness)
const RELATIVE_GATE_LU: f64 = -10.0;

const BLOCK_DURATION_S: f64 = 0.4;
const BLOCK_OVERLAP: f64 = 0.75;

const SHORT_TERM_WINDOW_S: f64 = 3.0;
const SHORT_TERM_HOP_S: f64 = 1.5;
const SHORT_TERM_PERCENTILE: f32 = 90.0;

/// Offset of the RMS-based estimate used when gating leaves nothing to integrate
const RMS_FALLBACK_OFFSET_DB: f32 = -23.0;

/// Second-order IIR section (Direct Form II transposed)
#[derive(Debug, Clone)]
struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    z1: f64,
    z2: f64,
}

impl Biquad {
    fn normalized(b: [f64; 3], a: [f64; 3]) -> Self {
        Self {
            b0: b[0] / a[0],
            b1: b[1] / a[0],
            b2: b[2] / a[0],
            a1: a[1] / a[0],
            a2: a[2] / a[0],
            z1: 0.0,
            z2: 0.0,
        }
    }

    /// Stage 1: high shelf modelling the acoustic effect of the head
    fn high_shelf(sample_rate: f64, fc: f64, gain_db: f64, q: f64) -> Self {
        let a = 10f64.powf(gain_db / 40.0);
        let w0 = 2.0 * std::f64::consts::PI * fc / sample_rate;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * q);
        let two_sqrt_a_alpha = 2.0 * a.sqrt() * alpha;

        Self::normalized(
            [
                a * ((a + 1.0) + (a - 1.0) * cos_w0 + two_sqrt_a_alpha),
                -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_w0),
                a * ((a + 1.0) + (a - 1.0) * cos_w0 - two_sqrt_a_alpha),
            ],
            [
                (a + 1.0) - (a - 1.0) * cos_w0 + two_sqrt_a_alpha,
                2.0 * ((a - 1.0) - (a + 1.0) * cos_w0),
                (a + 1.0) - (a - 1.0) * cos_w0 - two_sqrt_a_alpha,
            ],
        )
    }

    /// Stage 2: RLB high-pass
    fn high_pass(sample_rate: f64, fc: f64, q: f64) -> Self {
        let w0 = 2.0 * std::f64::consts::PI * fc / sample_rate;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * q);

        Self::normalized(
            [(1.0 + cos_w0) / 2.0, -(1.0 + cos_w0), (1.0 + cos_w0) / 2.0],
            [1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha],
        )
    }

    fn process(&mut self, x: f64) -> f64 {
        let y = self.b0 * x + self.z1;
        self.z1 = self.b1 * x + self.z2 - self.a1 * y;
        self.z2 = self.b2 * x - self.a2 * y;
        y
    }
}

/// K-weighting pre-filter: +4 dB shelf at 1500 Hz followed by a 38 Hz high-pass
fn k_weight(samples: &[f32], sample_rate: u32) -> Vec<f64> {
    let sr = sample_rate as f64;
    let mut shelf = Biquad::high_shelf(sr, 1500.0, 4.0, std::f64::consts::FRAC_1_SQRT_2);
    let mut high_pass = Biquad::high_pass(sr, 38.0, 0.5);
    samples
        .iter()
        .map(|&x| high_pass.process(shelf.process(x as f64)))
        .collect()
}

/// Mean square of each gating block
struct GatingBlocks {
    mean_squares: Vec<f64>,
    block_len: usize,
    step: usize,
}

impl GatingBlocks {
    fn compute(weighted: &[f64], sample_rate: u32) -> Self {
        let block_len = ((BLOCK_DURATION_S * sample_rate as f64).round() as usize).max(1);
        let step = ((block_len as f64 * (1.0 - BLOCK_OVERLAP)).round() as usize).max(1);

        let mean_squares = if weighted.len() < block_len {
            Vec::new()
        } else {
            let count = (weighted.len() - block_len) / step + 1;
            (0..count)
                .map(|j| {
                    let block = &weighted[j * step..j * step + block_len];
                    block.iter().map(|x| x * x).sum::<f64>() / block_len as f64
                })
                .collect()
        };

        Self {
            mean_squares,
            block_len,
            step,
        }
    }

    /// Indices of the blocks lying entirely inside `[start, end)` samples
    fn within(&self, start: usize, end: usize) -> std::ops::Range<usize> {
        let first = start.div_ceil(self.step);
        let last = if end >= self.block_len {
            ((end - self.block_len) / self.step + 1).min(self.mean_squares.len())
        } else {
            0
        };
        first.min(last)..last
    }
}

fn block_loudness(mean_square: f64) -> f64 {
    -0.691 + 10.0 * mean_square.max(1e-20).log10()
}

/// Gated loudness of a set of block mean squares
fn gated_loudness(mean_squares: &[f64]) -> Result<f32, AnalysisError> {
    let above_absolute: Vec<f64> = mean_squares
        .iter()
        .copied()
        .filter(|&z| block_loudness(z) > ABSOLUTE_GATE_LUFS)
        .collect();
    if above_absolute.is_empty() {
        return Err(AnalysisError::extraction(
            "loudness",
            "all blocks below the absolute gate",
        ));
    }

    let mean_abs = above_absolute.iter().sum::<f64>() / above_absolute.len() as f64;
    let relative_gate = block_loudness(mean_abs) + RELATIVE_GATE_LU;

    let gated: Vec<f64> = above_absolute
        .into_iter()
        .filter(|&z| block_loudness(z) > relative_gate)
        .collect();
    if gated.is_empty() {
        return Err(AnalysisError::extraction(
            "loudness",
            "all blocks below the relative gate",
        ));
    }

    let mean = gated.iter().sum::<f64>() / gated.len() as f64;
    let lufs = block_loudness(mean) as f32;
    if lufs.is_finite() {
        Ok(lufs)
    } else {
        Err(AnalysisError::extraction("loudness", "non-finite loudness"))
    }
}

/// K-weighted gating blocks of a clip, at least one
fn weighted_blocks(samples: &[f32], sample_rate: u32) -> Result<GatingBlocks, AnalysisError> {
    if sample_rate == 0 {
        return Err(AnalysisError::extraction("loudness", "zero sample rate"));
    }
    let weighted = k_weight(samples, sample_rate);
    let blocks = GatingBlocks::compute(&weighted, sample_rate);
    if blocks.mean_squares.is_empty() {
        return Err(AnalysisError::extraction(
            "loudness",
            format!("clip of {} samples shorter than one gating block", samples.len()),
        ));
    }
    Ok(blocks)
}

/// Integrated loudness in LUFS
///
/// # Errors
///
/// Returns `AnalysisError::ExtractionFailure` when the clip is shorter than one 400 ms
/// block or every block is gated out
pub fn integrated_loudness(samples: &[f32], sample_rate: u32) -> Result<f32, AnalysisError> {
    gated_loudness(&weighted_blocks(samples, sample_rate)?.mean_squares)
}

/// `20·log10(rms) - 23`, the estimate used when gated measurement fails
pub fn rms_loudness_estimate(samples: &[f32]) -> f32 {
    let n = samples.len().max(1) as f64;
    let rms = (samples.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>() / n).sqrt() as f32;
    20.0 * rms.max(EPSILON).log10() + RMS_FALLBACK_OFFSET_DB
}

/// Integrated and short-term loudness
///
/// Integrated loudness failing is an error the caller resolves with
/// [`rms_loudness_estimate`]. A clip with no valid 3 s window reports its integrated value
/// as short-term loudness.
///
/// # Errors
///
/// Returns `AnalysisError::ExtractionFailure` when integrated loudness cannot be measured
pub fn measure_loudness(samples: &[f32], sample_rate: u32) -> Result<LoudnessMetrics, AnalysisError> {
    let blocks = weighted_blocks(samples, sample_rate)?;
    let integrated = gated_loudness(&blocks.mean_squares)?;

    let window = (SHORT_TERM_WINDOW_S * sample_rate as f64).round() as usize;
    let hop = ((SHORT_TERM_HOP_S * sample_rate as f64).round() as usize).max(1);
    let mut window_loudness = Vec::new();
    let mut start = 0;
    while start + window <= samples.len() {
        let range = blocks.within(start, start + window);
        if let Ok(lufs) = gated_loudness(&blocks.mean_squares[range]) {
            window_loudness.push(lufs);
        }
        start += hop;
    }

    let short_term = percentile(&window_loudness, SHORT_TERM_PERCENTILE).unwrap_or(integrated);

    log::debug!(
        "Loudness: integrated={:.2} LUFS, short-term={:.2} LUFS over {} windows",
        integrated,
        short_term,
        window_loudness.len()
    );

    Ok(LoudnessMetrics {
        integrated_lufs: integrated,
        short_term_lufs: short_term,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_signals::sine;

    #[test]
    fn test_full_scale_1khz_sine() {
        // BS.1770 calibration: 0 dBFS 1 kHz sine reads about -3.01 LUFS
        let samples = sine(997.0, 48_000, 5.0, 1.0);
        let lufs = integrated_loudness(&samples, 48_000).unwrap();
        assert!((lufs + 3.01).abs() < 0.3, "got {:.3} LUFS", lufs);
    }

    #[test]
    fn test_level_scales_loudness() {
        let loud = integrated_loudness(&sine(997.0, 48_000, 5.0, 0.5), 48_000).unwrap();
        let quiet = integrated_loudness(&sine(997.0, 48_000, 5.0, 0.05), 48_000).unwrap();
        assert!((loud - quiet - 20.0).abs() < 0.1);
    }

    #[test]
    fn test_relative_gate_ignores_quiet_section() {
        let mut samples = sine(997.0, 48_000, 5.0, 0.5);
        samples.extend(sine(997.0, 48_000, 5.0, 0.005));
        let gated = integrated_loudness(&samples, 48_000).unwrap();
        let loud_only = integrated_loudness(&sine(997.0, 48_000, 5.0, 0.5), 48_000).unwrap();
        assert!((gated - loud_only).abs() < 0.5, "{:.2} vs {:.2}", gated, loud_only);
    }

    #[test]
    fn test_short_term_tracks_loud_windows() {
        let mut samples = sine(997.0, 48_000, 6.0, 0.05);
        samples.extend(sine(997.0, 48_000, 6.0, 0.5));
        let metrics = measure_loudness(&samples, 48_000).unwrap();
        assert!(metrics.short_term_lufs > metrics.integrated_lufs - 1.0);
        assert!(metrics.short_term_lufs.is_finite());
    }

    #[test]
    fn test_short_clip_uses_integrated_for_short_term() {
        let samples = sine(997.0, 48_000, 1.0, 0.5);
        let metrics = measure_loudness(&samples, 48_000).unwrap();
        assert_eq!(metrics.short_term_lufs, metrics.integrated_lufs);
    }

    #[test]
    fn test_silence_fails_and_estimate_is_finite() {
        let samples = vec![0.0f32; 48_000 * 2];
        assert!(measure_loudness(&samples, 48_000).is_err());
        assert!(rms_loudness_estimate(&samples).is_finite());
    }

    #[test]
    fn test_measure_matches_integrated() {
        let mut samples = sine(997.0, 48_000, 4.0, 0.5);
        samples.extend(sine(997.0, 48_000, 4.0, 0.1));
        let metrics = measure_loudness(&samples, 48_000).unwrap();
        assert_eq!(
            metrics.integrated_lufs,
            integrated_loudness(&samples, 48_000).unwrap()
        );
        assert!(measure_loudness(&samples, 0).is_err());
    }

    #[test]
    fn test_too_short_for_one_block() {
        let samples = sine(997.0, 48_000, 0.1, 0.5);
        assert!(integrated_loudness(&samples, 48_000).is_err());
    }
}
