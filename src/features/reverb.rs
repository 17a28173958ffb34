//! Reverb tail estimation
//!
//! Frame energy is tracked at a fixed 2048/512 framing. Every frame at or above the 90th
//! percentile starts a decay measurement that ends at the first later frame at or below
//! 10% of that level; the median elapsed time is the tail estimate.
//!
//! Overlapping decays are measured independently, so sustained loud passages contribute
//! many nearly identical measurements.

use crate::error::AnalysisError;
use crate::features::spectral::{frame_energies, stats::median, stats::percentile, EPSILON};

/// Frame size used for the energy envelope
pub const REVERB_FRAME_SIZE: usize = 2048;

/// Hop size used for the energy envelope
pub const REVERB_HOP_SIZE: usize = 512;

/// Tail reported when no decay can be measured (seconds)
pub const DEFAULT_REVERB_TAIL_S: f32 = 0.2;

const HIGH_PERCENTILE: f32 = 90.0;
const DECAY_RATIO: f32 = 0.1;

/// Estimate the reverb tail in seconds
///
/// # Errors
///
/// Returns `AnalysisError::ExtractionFailure` when the energy profile carries no signal or
/// no decay from a loud frame to 10% of its level exists; callers substitute
/// [`DEFAULT_REVERB_TAIL_S`]
pub fn estimate_reverb_tail(samples: &[f32], sample_rate: u32) -> Result<f32, AnalysisError> {
    if sample_rate == 0 {
        return Err(AnalysisError::extraction("reverb", "zero sample rate"));
    }

    let energies = frame_energies(samples, REVERB_FRAME_SIZE, REVERB_HOP_SIZE);
    let high = percentile(&energies, HIGH_PERCENTILE)
        .ok_or_else(|| AnalysisError::extraction("reverb", "no energy frames"))?;
    if high <= EPSILON {
        return Err(AnalysisError::extraction("reverb", "energy profile has no signal"));
    }
    let low = DECAY_RATIO * high;

    let frame_seconds = REVERB_HOP_SIZE as f32 / sample_rate as f32;
    let decays: Vec<f32> = energies
        .iter()
        .enumerate()
        .filter(|(_, &e)| e >= high)
        .filter_map(|(start, _)| {
            energies[start + 1..]
                .iter()
                .position(|&e| e <= low)
                .map(|offset| (offset + 1) as f32 * frame_seconds)
        })
        .collect();

    let tail = median(&decays)
        .ok_or_else(|| AnalysisError::extraction("reverb", "no decay below 10% of peak level"))?;

    log::debug!(
        "Reverb tail: {:.3} s from {} decays over {} frames",
        tail,
        decays.len(),
        energies.len()
    );

    Ok(tail)
}
