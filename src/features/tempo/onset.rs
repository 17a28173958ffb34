//! Onset detection and onset-strength envelopes
//!
//! Two views of rhythmic activity:
//! - **Energy flux onsets**: discrete onset times from the frame-to-frame RMS increase
//!   (used by the primary tempo estimate)
//! - **Spectral flux envelope**: a continuous per-frame onset strength from log-compressed
//!   magnitude increases (used by the autocorrelation fallback)
//!
//! # Reference
//!
//! Bello, J. P., Daudet, L., Abdallah, S., Duxbury, C., Davies, M., & Sandler, M. B. (2005).
//! A Tutorial on Onset Detection in Music Signals.
//! *IEEE Transactions on Speech and Audio Processing*, 13(5), 1035-1047.

use crate::error::AnalysisError;
use crate::features::spectral::{Spectrogram, EPSILON};

/// Detect onsets using the energy flux method
///
/// # Arguments
///
/// * `samples` - Audio samples (mono)
/// * `frame_size` - Frame size for analysis (typically 2048)
/// * `hop_size` - Hop size between frames (typically 512)
/// * `threshold_db` - Threshold in dB relative to maximum flux (typically -20 to -30 dB)
///
/// # Returns
///
/// Onset times in samples, sorted by time. Silence and audio shorter than two frames
/// yield an empty list.
///
/// # Errors
///
/// Returns `AnalysisError::ExtractionFailure` for zero frame or hop sizes
pub fn detect_energy_flux_onsets(
    samples: &[f32],
    frame_size: usize,
    hop_size: usize,
    threshold_db: f32,
) -> Result<Vec<usize>, AnalysisError> {
    if frame_size == 0 || hop_size == 0 {
        return Err(AnalysisError::extraction(
            "tempo",
            format!("invalid onset framing: frame={}, hop={}", frame_size, hop_size),
        ));
    }

    if samples.len() < frame_size {
        log::debug!(
            "Frame size ({}) larger than audio length ({}), no onsets",
            frame_size,
            samples.len()
        );
        return Ok(Vec::new());
    }

    let num_frames = (samples.len() - frame_size) / hop_size + 1;
    if num_frames < 3 {
        return Ok(Vec::new());
    }

    log::debug!(
        "Detecting energy flux onsets: {} samples, frame={}, hop={}, threshold={:.1} dB",
        samples.len(),
        frame_size,
        hop_size,
        threshold_db
    );

    let frame_rms: Vec<f32> = (0..num_frames)
        .map(|i| {
            let start = i * hop_size;
            let sum_sq: f32 = samples[start..start + frame_size]
                .iter()
                .map(|&x| x * x)
                .sum();
            (sum_sq / frame_size as f32).sqrt()
        })
        .collect();

    // E_flux[n] = max(0, E[n+1] - E[n])
    let energy_flux: Vec<f32> = frame_rms
        .windows(2)
        .map(|w| (w[1] - w[0]).max(0.0))
        .collect();

    let max_flux = energy_flux.iter().copied().fold(0.0f32, f32::max);
    if max_flux <= EPSILON {
        log::debug!("All energy flux values are zero, no onsets detected");
        return Ok(Vec::new());
    }

    let threshold_linear = max_flux * 10.0_f32.powf(threshold_db / 20.0);

    let mut onsets = Vec::new();

    if energy_flux[0] > threshold_linear && energy_flux[0] >= energy_flux[1] {
        onsets.push(hop_size);
    }

    // Local maxima above threshold; >= on the right to handle plateaus
    for i in 1..(energy_flux.len() - 1) {
        let flux = energy_flux[i];
        if flux > threshold_linear && flux > energy_flux[i - 1] && flux >= energy_flux[i + 1] {
            // flux[i] compares frames i and i+1, so the onset starts frame i+1
            onsets.push((i + 1) * hop_size);
        }
    }

    let last = energy_flux.len() - 1;
    if energy_flux[last] > threshold_linear && energy_flux[last] > energy_flux[last - 1] {
        onsets.push((last + 1) * hop_size);
    }

    onsets.retain(|&s| s < samples.len());
    onsets.sort_unstable();
    onsets.dedup_by(|later, earlier| *later < *earlier + hop_size / 2);

    log::debug!("Energy flux detected {} onsets", onsets.len());

    Ok(onsets)
}

/// Spectral flux onset-strength envelope, one value per spectrogram frame
///
/// `strength[t] = Σ_k max(0, ln(1 + |X_t[k]|) - ln(1 + |X_{t-1}[k]|))`, with
/// `strength[0] = 0`.
pub fn onset_strength_envelope(spectrogram: &Spectrogram) -> Vec<f32> {
    let mut envelope = Vec::with_capacity(spectrogram.num_frames());
    let mut previous: Option<Vec<f32>> = None;

    for frame in spectrogram.frames() {
        let compressed: Vec<f32> = frame.iter().map(|&m| m.ln_1p()).collect();
        let strength = match &previous {
            Some(prev) => compressed
                .iter()
                .zip(prev)
                .map(|(&cur, &old)| (cur - old).max(0.0))
                .sum(),
            None => 0.0,
        };
        envelope.push(strength);
        previous = Some(compressed);
    }

    envelope
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_signals::kick_pattern;

    #[test]
    fn test_energy_flux_step() {
        let mut samples = vec![0.0f32; 48_000];
        for s in samples.iter_mut().skip(5000) {
            *s = 0.5;
        }

        let onsets = detect_energy_flux_onsets(&samples, 2048, 512, -30.0).unwrap();
        assert!(!onsets.is_empty(), "Step should produce an onset");
        assert!(
            onsets[0] >= 3000 && onsets[0] <= 8000,
            "Onset should be near the step at 5000, got {}",
            onsets[0]
        );
    }

    #[test]
    fn test_energy_flux_kick_pattern() {
        let sample_rate = 48_000.0;
        let samples = kick_pattern(4.0, 120.0, 48_000, 150.0);
        let onsets = detect_energy_flux_onsets(&samples, 2048, 512, -30.0).unwrap();

        assert!(
            onsets.len() >= 6 && onsets.len() <= 20,
            "Expected 6-20 onsets for 4s at 120 BPM, got {}",
            onsets.len()
        );

        let expected_interval = (0.5 * sample_rate) as i64;
        let intervals: Vec<i64> = onsets.windows(2).map(|w| (w[1] - w[0]) as i64).collect();
        let avg = intervals.iter().sum::<i64>() / intervals.len() as i64;
        assert!(
            (avg - expected_interval).abs() < expected_interval / 2,
            "Onset intervals should be ~{} samples, got {}",
            expected_interval,
            avg
        );
    }

    #[test]
    fn test_energy_flux_silence_and_short() {
        assert!(detect_energy_flux_onsets(&vec![0.0; 48_000], 2048, 512, -20.0)
            .unwrap()
            .is_empty());
        assert!(detect_energy_flux_onsets(&vec![0.5; 1000], 2048, 512, -20.0)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_energy_flux_invalid_parameters() {
        let samples = vec![0.5f32; 48_000];
        assert!(detect_energy_flux_onsets(&samples, 0, 512, -20.0).is_err());
        assert!(detect_energy_flux_onsets(&samples, 2048, 0, -20.0).is_err());
    }

    #[test]
    fn test_onset_envelope_peaks_at_kicks() {
        let samples = kick_pattern(2.0, 120.0, 48_000, 100.0);
        let spectrogram = Spectrogram::compute(&samples, 48_000, 2048, 512).unwrap();
        let envelope = onset_strength_envelope(&spectrogram);

        assert_eq!(envelope.len(), spectrogram.num_frames());
        assert_eq!(envelope[0], 0.0);
        assert!(envelope.iter().all(|v| *v >= 0.0));
        assert!(envelope.iter().any(|v| *v > 0.0));
    }
}
