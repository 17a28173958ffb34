//! Tempo estimation
//!
//! A two-tier estimator:
//! 1. **Primary**: energy-flux onsets → autocorrelation of the onset train → strongest
//!    candidate inside the configured BPM range
//! 2. **Fallback** (primary non-positive, non-finite or failed): spectral-flux
//!    onset-strength envelope at a fixed 512-sample hop → autocorrelation → strongest
//!    peak between 60 and 200 BPM
//!
//! When both tiers fail the caller substitutes [`DEFAULT_BPM`].

pub mod onset;
pub mod period;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::spectral::Spectrogram;

pub use onset::{detect_energy_flux_onsets, onset_strength_envelope};
pub use period::{estimate_bpm_from_envelope, estimate_bpm_from_onsets, BpmCandidate};

/// Tempo reported when no estimate can be made
pub const DEFAULT_BPM: f32 = 120.0;

/// Hop size of the fallback onset envelope
pub const FALLBACK_HOP_SIZE: usize = 512;

/// Frame size of the fallback onset envelope
pub const FALLBACK_FRAME_SIZE: usize = 2048;

/// Fallback search range
pub const FALLBACK_MIN_BPM: f32 = 60.0;
/// Fallback search range
pub const FALLBACK_MAX_BPM: f32 = 200.0;

/// Estimate tempo in BPM
///
/// # Errors
///
/// Returns `AnalysisError::ExtractionFailure` when both the primary and the fallback
/// estimate fail; the returned value is otherwise always positive and finite.
pub fn estimate_tempo(
    samples: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
) -> Result<f32, AnalysisError> {
    match primary_tempo(samples, sample_rate, config) {
        Ok(bpm) if bpm.is_finite() && bpm > 0.0 => {
            log::debug!("Primary tempo estimate: {:.2} BPM", bpm);
            return Ok(bpm);
        }
        Ok(bpm) => log::warn!("Primary tempo estimate unusable ({}), trying fallback", bpm),
        Err(e) => log::warn!("Primary tempo estimate failed ({}), trying fallback", e),
    }

    let bpm = fallback_tempo(samples, sample_rate)?;
    if bpm.is_finite() && bpm > 0.0 {
        Ok(bpm)
    } else {
        Err(AnalysisError::extraction(
            "tempo",
            format!("fallback produced unusable tempo {}", bpm),
        ))
    }
}

/// Onset detection + onset-train autocorrelation
pub fn primary_tempo(
    samples: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
) -> Result<f32, AnalysisError> {
    let onsets = detect_energy_flux_onsets(
        samples,
        config.frame_size,
        config.hop_size,
        config.onset_threshold_db,
    )?;

    let candidates = estimate_bpm_from_onsets(
        &onsets,
        sample_rate,
        config.hop_size,
        config.min_bpm,
        config.max_bpm,
    )?;

    candidates
        .first()
        .map(|c| c.bpm)
        .ok_or_else(|| AnalysisError::extraction("tempo", "no BPM candidate from onsets"))
}

/// Spectral-flux envelope autocorrelation at the fixed fallback hop
pub fn fallback_tempo(samples: &[f32], sample_rate: u32) -> Result<f32, AnalysisError> {
    let spectrogram =
        Spectrogram::compute(samples, sample_rate, FALLBACK_FRAME_SIZE, FALLBACK_HOP_SIZE)?;
    let envelope = onset_strength_envelope(&spectrogram);
    estimate_bpm_from_envelope(
        &envelope,
        sample_rate,
        FALLBACK_HOP_SIZE,
        FALLBACK_MIN_BPM,
        FALLBACK_MAX_BPM,
    )
}
