//! Autocorrelation-based period estimation
//!
//! Two entry points share the same idea: periodicity in onset activity shows up as a
//! peak in its autocorrelation at the beat lag, and `BPM = 60 * sample_rate / (lag * hop)`.
//!
//! - [`estimate_bpm_from_onsets`] works on a binary onset train and ranks every peak
//! - [`estimate_bpm_from_envelope`] works on a continuous onset-strength envelope and
//!   returns only the strongest peak

use crate::error::AnalysisError;
use crate::features::spectral::{autocorrelation_fft, EPSILON};

/// BPM candidate with confidence
#[derive(Debug, Clone, PartialEq)]
pub struct BpmCandidate {
    /// BPM estimate
    pub bpm: f32,

    /// Confidence score (0.0-1.0), peak height relative to the strongest ACF value
    pub confidence: f32,
}

/// Lag range in frames covering `[min_bpm, max_bpm]`
fn lag_range(sample_rate: u32, hop_size: usize, min_bpm: f32, max_bpm: f32) -> (usize, usize) {
    let frames_per_minute = 60.0 * sample_rate as f32 / hop_size as f32;
    let lag_min = (frames_per_minute / max_bpm).ceil() as usize;
    let lag_max = (frames_per_minute / min_bpm).floor() as usize;
    (lag_min.max(1), lag_max)
}

fn lag_to_bpm(lag: f32, sample_rate: u32, hop_size: usize) -> f32 {
    60.0 * sample_rate as f32 / (lag * hop_size as f32)
}

fn validate(
    sample_rate: u32,
    hop_size: usize,
    min_bpm: f32,
    max_bpm: f32,
) -> Result<(), AnalysisError> {
    if sample_rate == 0 || hop_size == 0 {
        return Err(AnalysisError::extraction(
            "tempo",
            format!("invalid framing: rate={}, hop={}", sample_rate, hop_size),
        ));
    }
    if !(min_bpm > 0.0 && min_bpm < max_bpm) {
        return Err(AnalysisError::extraction(
            "tempo",
            format!("invalid BPM range: [{:.1}, {:.1}]", min_bpm, max_bpm),
        ));
    }
    Ok(())
}

/// Estimate BPM candidates from onset times
///
/// # Arguments
///
/// * `onsets` - Onset times in samples
/// * `sample_rate` - Sample rate in Hz
/// * `hop_size` - Hop size used for onset detection (samples per frame)
/// * `min_bpm` / `max_bpm` - Tempo search range
///
/// # Returns
///
/// BPM candidates ranked by confidence (highest first); empty when fewer than two onsets
/// exist or the onset train is too short to cover the lag range.
///
/// # Errors
///
/// Returns `AnalysisError::ExtractionFailure` for zero rate/hop or an inverted BPM range
pub fn estimate_bpm_from_onsets(
    onsets: &[usize],
    sample_rate: u32,
    hop_size: usize,
    min_bpm: f32,
    max_bpm: f32,
) -> Result<Vec<BpmCandidate>, AnalysisError> {
    validate(sample_rate, hop_size, min_bpm, max_bpm)?;

    log::debug!(
        "Estimating BPM from {} onsets, {} Hz, hop={}, range=[{:.1}, {:.1}] BPM",
        onsets.len(),
        sample_rate,
        hop_size,
        min_bpm,
        max_bpm
    );

    if onsets.len() < 2 {
        log::debug!("Too few onsets for autocorrelation: {}", onsets.len());
        return Ok(vec![]);
    }

    // Binary onset train, one slot per frame
    let signal_length = onsets.iter().max().copied().unwrap_or(0) / hop_size + 1;
    let mut onset_train = vec![0.0f32; signal_length];
    for &onset in onsets {
        onset_train[onset / hop_size] = 1.0;
    }

    let acf = autocorrelation_fft(&onset_train);

    let (lag_min, lag_max) = lag_range(sample_rate, hop_size, min_bpm, max_bpm);
    if lag_min >= lag_max || lag_max >= acf.len() {
        log::debug!(
            "Lag range [{}, {}] not covered by ACF of length {}",
            lag_min,
            lag_max,
            acf.len()
        );
        return Ok(vec![]);
    }

    let max_acf = acf.iter().copied().fold(0.0f32, f32::max);
    let mut candidates: Vec<BpmCandidate> = find_peaks_in_acf(&acf[lag_min..=lag_max], lag_min)
        .into_iter()
        .map(|(lag, value)| BpmCandidate {
            bpm: lag_to_bpm(lag as f32, sample_rate, hop_size),
            confidence: if max_acf > EPSILON {
                (value / max_acf).min(1.0)
            } else {
                0.0
            },
        })
        .filter(|c| c.bpm >= min_bpm && c.bpm <= max_bpm)
        .collect();

    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    log::debug!("Autocorrelation found {} BPM candidates", candidates.len());

    Ok(candidates)
}

/// Find local maxima with at least 10% prominence, merging peaks closer than two lags
fn find_peaks_in_acf(acf_slice: &[f32], offset: usize) -> Vec<(usize, f32)> {
    if acf_slice.len() < 3 {
        return vec![];
    }

    let max_value = acf_slice.iter().copied().fold(0.0f32, f32::max);
    if max_value < EPSILON {
        return vec![];
    }

    let min_prominence = max_value * 0.1;
    let min_distance = 2;

    let mut peaks: Vec<(usize, f32)> = Vec::new();
    for i in 1..(acf_slice.len() - 1) {
        let value = acf_slice[i];
        let left = acf_slice[i - 1];
        let right = acf_slice[i + 1];

        if value > left && value > right && value - left.max(right) >= min_prominence {
            let lag = i + offset;
            match peaks.last_mut() {
                Some(last) if lag - last.0 < min_distance => {
                    if value > last.1 {
                        *last = (lag, value);
                    }
                }
                _ => peaks.push((lag, value)),
            }
        }
    }

    peaks.sort_by(|a, b| b.1.total_cmp(&a.1));
    peaks
}

/// Estimate BPM from a continuous onset-strength envelope
///
/// The envelope is mean-removed before autocorrelation; the strongest local maximum
/// inside the lag range wins and its lag is refined by parabolic interpolation.
///
/// # Errors
///
/// Returns `AnalysisError::ExtractionFailure` when the envelope is too short for the lag
/// range, carries no periodicity, or no local maximum exists in range.
pub fn estimate_bpm_from_envelope(
    envelope: &[f32],
    sample_rate: u32,
    hop_size: usize,
    min_bpm: f32,
    max_bpm: f32,
) -> Result<f32, AnalysisError> {
    validate(sample_rate, hop_size, min_bpm, max_bpm)?;

    let mean = envelope.iter().sum::<f32>() / envelope.len().max(1) as f32;
    let centred: Vec<f32> = envelope.iter().map(|&v| v - mean).collect();
    let acf = autocorrelation_fft(&centred);

    let (lag_min, lag_max) = lag_range(sample_rate, hop_size, min_bpm, max_bpm);
    let lag_max = lag_max.min(acf.len().saturating_sub(2));
    if lag_min > lag_max {
        return Err(AnalysisError::extraction(
            "tempo",
            format!(
                "envelope of {} frames too short for lag range starting at {}",
                envelope.len(),
                lag_min
            ),
        ));
    }

    if acf.first().copied().unwrap_or(0.0) <= EPSILON {
        return Err(AnalysisError::extraction(
            "tempo",
            "onset envelope has no variation",
        ));
    }

    let best = (lag_min..=lag_max)
        .filter(|&lag| acf[lag] > acf[lag - 1] && acf[lag] >= acf[lag + 1])
        .fold(None::<usize>, |best, lag| match best {
            Some(b) if acf[b] >= acf[lag] => Some(b),
            _ => Some(lag),
        })
        .ok_or_else(|| AnalysisError::extraction("tempo", "no autocorrelation peak in range"))?;

    let (left, centre, right) = (acf[best - 1], acf[best], acf[best + 1]);
    let denom = left - 2.0 * centre + right;
    let shift = if denom.abs() > EPSILON {
        (0.5 * (left - right) / denom).clamp(-0.5, 0.5)
    } else {
        0.0
    };

    let bpm = lag_to_bpm(best as f32 + shift, sample_rate, hop_size);
    log::debug!(
        "Envelope autocorrelation peak at lag {:.2} -> {:.2} BPM",
        best as f32 + shift,
        bpm
    );
    Ok(bpm)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn onset_train(bpm: f32, sample_rate: u32, hop_size: usize, beats: usize) -> Vec<usize> {
        let period_frames =
            ((60.0 * sample_rate as f32 / bpm) / hop_size as f32).round() as usize;
        (0..beats).map(|b| b * period_frames * hop_size).collect()
    }

    #[test]
    fn test_onsets_120bpm() {
        let onsets = onset_train(120.0, 48_000, 512, 8);
        let candidates = estimate_bpm_from_onsets(&onsets, 48_000, 512, 60.0, 200.0).unwrap();

        assert!(!candidates.is_empty(), "Should find at least one candidate");
        assert!(
            (candidates[0].bpm - 120.0).abs() < 5.0,
            "Best BPM should be close to 120, got {:.2}",
            candidates[0].bpm
        );
        assert!(candidates[0].confidence > 0.0);
    }

    #[test]
    fn test_onsets_single_onset() {
        let candidates = estimate_bpm_from_onsets(&[1000], 48_000, 512, 60.0, 200.0).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_onsets_invalid_params() {
        let onsets = vec![1000, 2000];
        assert!(estimate_bpm_from_onsets(&onsets, 0, 512, 60.0, 200.0).is_err());
        assert!(estimate_bpm_from_onsets(&onsets, 48_000, 0, 60.0, 200.0).is_err());
        assert!(estimate_bpm_from_onsets(&onsets, 48_000, 512, 200.0, 60.0).is_err());
    }

    #[test]
    fn test_find_peaks_in_acf() {
        let acf = vec![0.1, 0.2, 0.5, 0.3, 0.4, 0.6, 0.2, 0.1];
        let peaks = find_peaks_in_acf(&acf, 0);
        assert_eq!(peaks[0].0, 5);
        assert!(peaks.iter().any(|(idx, _)| *idx == 2));
    }

    #[test]
    fn test_envelope_impulse_train() {
        // Pulse every 48 frames at 48 kHz / 512 hop -> 117.19 BPM
        let mut envelope = vec![0.0f32; 1200];
        for i in (0..envelope.len()).step_by(48) {
            envelope[i] = 1.0;
        }
        let bpm = estimate_bpm_from_envelope(&envelope, 48_000, 512, 60.0, 200.0).unwrap();
        assert!((bpm - 117.19).abs() < 1.0, "got {:.2}", bpm);
    }

    #[test]
    fn test_envelope_flat_fails() {
        let envelope = vec![0.0f32; 1200];
        assert!(estimate_bpm_from_envelope(&envelope, 48_000, 512, 60.0, 200.0).is_err());
    }

    #[test]
    fn test_envelope_too_short_fails() {
        let envelope = vec![0.0, 1.0, 0.0, 1.0];
        assert!(estimate_bpm_from_envelope(&envelope, 48_000, 512, 60.0, 200.0).is_err());
    }
}
