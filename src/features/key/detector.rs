//! Key detection algorithm
//!
//! Correlates an averaged chroma vector against all 24 Krumhansl-Schmuckler templates
//! and picks the key with the highest Pearson correlation.
//!
//! Exact ties are broken by enumeration order: C..B major, then C..B minor; the first
//! candidate with a strictly greater correlation wins.

use super::templates::KeyTemplates;
use crate::analysis::result::{Key, KeyEstimate};
use crate::error::AnalysisError;

/// Pearson correlation coefficient of two 12-bin vectors
///
/// Returns NaN when either vector has zero variance.
pub fn pearson_correlation(x: &[f32; 12], y: &[f32; 12]) -> f32 {
    let mean_x = x.iter().map(|&v| v as f64).sum::<f64>() / 12.0;
    let mean_y = y.iter().map(|&v| v as f64).sum::<f64>() / 12.0;

    let mut cov = 0.0f64;
    let mut var_x = 0.0f64;
    let mut var_y = 0.0f64;
    for (&a, &b) in x.iter().zip(y) {
        let dx = a as f64 - mean_x;
        let dy = b as f64 - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom <= f64::EPSILON {
        return f32::NAN;
    }
    (cov / denom) as f32
}

/// Detect musical key from an averaged chroma vector
///
/// # Arguments
///
/// * `chroma` - 12-element chroma vector (index 0 = C)
/// * `templates` - Key templates
///
/// # Returns
///
/// Best key with its confidence (correlation clamped to [0, 1])
///
/// # Errors
///
/// Returns `AnalysisError::ExtractionFailure` when the chroma vector is flat or
/// non-finite, so no correlation is defined
///
/// # Example
///
/// ```
/// use vocalchain_dsp::features::key::{detect_key, KeyTemplates};
/// use vocalchain_dsp::analysis::result::Key;
///
/// // Energy on C, E and G
/// let mut chroma = [0.0f32; 12];
/// chroma[0] = 1.0;
/// chroma[4] = 1.0;
/// chroma[7] = 1.0;
///
/// let result = detect_key(&chroma, &KeyTemplates::new())?;
/// assert_eq!(result.key, Key::Major(0));
/// # Ok::<(), vocalchain_dsp::AnalysisError>(())
/// ```
pub fn detect_key(
    chroma: &[f32; 12],
    templates: &KeyTemplates,
) -> Result<KeyEstimate, AnalysisError> {
    if chroma.iter().any(|c| !c.is_finite()) {
        return Err(AnalysisError::extraction("key", "non-finite chroma"));
    }

    let candidates = (0..12)
        .map(|t| (Key::Major(t), templates.get_major_template(t)))
        .chain((0..12).map(|t| (Key::Minor(t), templates.get_minor_template(t))));

    let mut best: Option<(Key, f32)> = None;

    for (key, template) in candidates {
        let r = pearson_correlation(chroma, template);
        if r.is_nan() {
            continue;
        }
        match best {
            Some((_, best_r)) if r <= best_r => {}
            _ => best = Some((key, r)),
        }
    }

    let (key, r) = best.ok_or_else(|| {
        AnalysisError::extraction("key", "flat chroma, correlation undefined")
    })?;

    let confidence = r.clamp(0.0, 1.0);
    log::debug!("Detected key {} (r={:.3})", key.name(), r);

    Ok(KeyEstimate { key, confidence })
}
