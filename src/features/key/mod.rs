//! Key detection
//!
//! Detect musical key using:
//! - Krumhansl-Schmuckler templates (24 keys)
//! - Pearson correlation against the clip-averaged chroma vector

pub mod detector;
pub mod templates;

pub use detector::{detect_key, pearson_correlation};
pub use templates::KeyTemplates;

use crate::analysis::result::KeyEstimate;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::chroma::{average_chroma, extract_chroma};

/// Estimate the key of a clip
///
/// Chroma is extracted with `config.chroma_frame_size` frames at half-frame hop,
/// averaged over time, and matched against all 24 templates.
///
/// # Errors
///
/// Returns `AnalysisError::ExtractionFailure` when no chroma can be computed or the
/// averaged chroma is flat (silence, pure noise floor)
pub fn estimate_key(
    samples: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
) -> Result<KeyEstimate, AnalysisError> {
    let frame_size = config.chroma_frame_size;
    let hop_size = (frame_size / 2).max(1);

    let chroma_frames = extract_chroma(samples, sample_rate, frame_size, hop_size)?;
    let chroma = average_chroma(&chroma_frames)
        .ok_or_else(|| AnalysisError::extraction("key", "no chroma frames"))?;

    detect_key(&chroma, &KeyTemplates::new())
}
