//! Buffer validation and sanitizing

use std::borrow::Cow;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::io::AudioBuffer;

/// Validate `buffer` and return the samples to analyse
///
/// Borrows the caller's samples when nothing needs replacing; allocates only when
/// non-finite samples have to be zeroed.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if the buffer is empty, has a zero sample rate,
/// does not match `config.sample_rate`, or contains no finite sample at all.
pub fn prepare_samples<'a>(
    buffer: &AudioBuffer<'a>,
    config: &AnalysisConfig,
) -> Result<Cow<'a, [f32]>, AnalysisError> {
    if buffer.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Empty audio samples".to_string(),
        ));
    }

    if buffer.sample_rate() == 0 {
        return Err(AnalysisError::InvalidInput(
            "Invalid sample rate: 0".to_string(),
        ));
    }

    if buffer.sample_rate() != config.sample_rate {
        return Err(AnalysisError::InvalidInput(format!(
            "Sample rate mismatch: buffer is {} Hz, engine expects {} Hz",
            buffer.sample_rate(),
            config.sample_rate
        )));
    }

    let max_samples = (config.max_duration_s as f64 * config.sample_rate as f64) as usize;
    let samples = if buffer.len() > max_samples {
        log::warn!(
            "Truncating {:.1}s buffer to {:.1}s for analysis",
            buffer.duration_seconds(),
            config.max_duration_s
        );
        &buffer.samples()[..max_samples.max(1)]
    } else {
        buffer.samples()
    };

    let non_finite = samples.iter().filter(|x| !x.is_finite()).count();
    if non_finite == samples.len() {
        return Err(AnalysisError::InvalidInput(
            "Audio contains no finite samples".to_string(),
        ));
    }

    if non_finite == 0 {
        return Ok(Cow::Borrowed(samples));
    }

    log::warn!(
        "Replacing {} non-finite samples (of {}) with silence",
        non_finite,
        samples.len()
    );
    Ok(Cow::Owned(
        samples
            .iter()
            .map(|&x| if x.is_finite() { x } else { 0.0 })
            .collect(),
    ))
}
