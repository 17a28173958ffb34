//! Vocal descriptors: presence, sibilance, plosives and note stability

use crate::analysis::result::VocalMetrics;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::spectral::{band_energy_ratio, stats::mean_std, Spectrogram, EPSILON};

/// Band whose energy share decides vocal presence (Hz)
pub const PRESENCE_BAND: (f32, f32) = (300.0, 3000.0);
/// Sibilance band (Hz)
pub const SIBILANCE_BAND: (f32, f32) = (5000.0, 10_000.0);
/// Plosive band (Hz)
pub const PLOSIVE_BAND: (f32, f32) = (50.0, 200.0);
/// f0 search range (Hz)
pub const F0_RANGE: (f32, f32) = (80.0, 1000.0);

/// Minimum valid f0 observations for a stability estimate
pub const MIN_F0_OBSERVATIONS: usize = 10;

/// Stability reported when too few f0 observations exist
pub const NEUTRAL_STABILITY: f32 = 0.5;

/// A frame's f0 peak must exceed this fraction of the loudest peak to count
const F0_PEAK_FLOOR: f32 = 0.1;

impl Default for VocalMetrics {
    fn default() -> Self {
        Self {
            present: false,
            sibilance_idx: 0.0,
            plosive_idx: 0.0,
            note_stability: 0.0,
        }
    }
}

/// Vocal descriptors of a spectrogram
///
/// Note stability is only measured when a vocal is present; otherwise it is 0.0.
///
/// # Errors
///
/// Returns `AnalysisError::ExtractionFailure` when the spectrum carries no energy
pub fn analyze_vocal(
    spectrogram: &Spectrogram,
    config: &AnalysisConfig,
) -> Result<VocalMetrics, AnalysisError> {
    let power = spectrogram.mean_power();
    let resolution = spectrogram.resolution_hz();
    let ratio = |(lo, hi): (f32, f32)| {
        band_energy_ratio(&power, resolution, lo, hi)
            .ok_or_else(|| AnalysisError::extraction("vocal", "spectrum carries no energy"))
    };

    let presence = ratio(PRESENCE_BAND)?;
    let present = presence > config.vocal_presence_threshold;
    let sibilance_idx = ratio(SIBILANCE_BAND)?;
    let plosive_idx = ratio(PLOSIVE_BAND)?;

    let note_stability = if present {
        note_stability(&f0_track(spectrogram))
    } else {
        0.0
    };

    log::debug!(
        "Vocal: presence ratio={:.3} (present={}), sibilance={:.3}, plosive={:.3}, stability={:.3}",
        presence,
        present,
        sibilance_idx,
        plosive_idx,
        note_stability
    );

    Ok(VocalMetrics {
        present,
        sibilance_idx,
        plosive_idx,
        note_stability,
    })
}

/// Per-frame f0 estimates from magnitude-weighted spectral peak picking
///
/// In each frame the strongest bin inside [`F0_RANGE`] is refined by the magnitude-weighted
/// mean frequency of itself and its two neighbours. Frames whose peak is weaker than 10% of
/// the strongest peak in the clip are dropped.
pub fn f0_track(spectrogram: &Spectrogram) -> Vec<f32> {
    let range = spectrogram.bin_range(F0_RANGE.0, F0_RANGE.1);
    if range.is_empty() {
        return Vec::new();
    }

    let peaks: Vec<(f32, f32)> = spectrogram
        .frames()
        .filter_map(|frame| {
            let band = &frame[range.clone()];
            let (offset, &peak) = band
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(b.1))?;
            let bin = range.start + offset;

            let lo = bin.saturating_sub(1);
            let hi = (bin + 1).min(frame.len() - 1);
            let (weighted, total) = (lo..=hi).fold((0.0f32, 0.0f32), |(w, t), b| {
                (w + spectrogram.bin_frequency(b) * frame[b], t + frame[b])
            });
            let f0 = if total > EPSILON {
                weighted / total
            } else {
                spectrogram.bin_frequency(bin)
            };
            Some((f0, peak))
        })
        .collect();

    let global_peak = peaks.iter().map(|&(_, m)| m).fold(0.0f32, f32::max);
    if global_peak <= EPSILON {
        return Vec::new();
    }
    let floor = F0_PEAK_FLOOR * global_peak;

    peaks
        .into_iter()
        .filter(|&(f0, m)| m > floor && f0.is_finite() && f0 > 0.0)
        .map(|(f0, _)| f0)
        .collect()
}

/// `1 - clamp(std / mean, 0, 1)` of an f0 track
///
/// Returns [`NEUTRAL_STABILITY`] with fewer than [`MIN_F0_OBSERVATIONS`] values.
pub fn note_stability(f0: &[f32]) -> f32 {
    if f0.len() < MIN_F0_OBSERVATIONS {
        return NEUTRAL_STABILITY;
    }
    match mean_std(f0) {
        Some((mean, std)) if mean > EPSILON => 1.0 - (std / mean).clamp(0.0, 1.0),
        _ => NEUTRAL_STABILITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_signals::{noise, sine, voice_like};

    fn spectrogram(samples: &[f32]) -> Spectrogram {
        Spectrogram::compute(samples, 48_000, 2048, 512).unwrap()
    }

    #[test]
    fn test_steady_voice_is_present_and_stable() {
        let samples = voice_like(48_000, 2.0, 0.3);
        let vocal = analyze_vocal(&spectrogram(&samples), &AnalysisConfig::default()).unwrap();
        assert!(vocal.present);
        assert!(vocal.note_stability > 0.9, "stability {}", vocal.note_stability);
    }

    #[test]
    fn test_f0_track_follows_fundamental() {
        let samples = sine(440.0, 48_000, 1.0, 0.5);
        let track = f0_track(&spectrogram(&samples));
        assert!(track.len() >= MIN_F0_OBSERVATIONS);
        for f0 in track {
            assert!((f0 - 440.0).abs() < 15.0, "f0 {}", f0);
        }
    }

    #[test]
    fn test_noise_is_not_vocal() {
        let samples = noise(48_000, 0.5, 11);
        let vocal = analyze_vocal(&spectrogram(&samples), &AnalysisConfig::default()).unwrap();
        assert!(!vocal.present);
        assert_eq!(vocal.note_stability, 0.0);
        assert!(vocal.sibilance_idx > 0.15);
    }

    #[test]
    fn test_stability_edge_cases() {
        assert_eq!(note_stability(&[220.0; 5]), NEUTRAL_STABILITY);
        assert_eq!(note_stability(&[220.0; 20]), 1.0);

        let mut wobbly = vec![100.0; 10];
        wobbly.extend(vec![900.0; 10]);
        let s = note_stability(&wobbly);
        assert!(s < 0.5 && s >= 0.0);
    }

    #[test]
    fn test_silence_fails() {
        let samples = vec![0.0f32; 48_000];
        assert!(analyze_vocal(&spectrogram(&samples), &AnalysisConfig::default()).is_err());
    }
}
