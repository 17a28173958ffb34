//! Spectral balance: named band energy ratios and spectral tilt

use crate::analysis::result::{BandEnergies, SpectralMetrics};
use crate::error::AnalysisError;
use crate::features::spectral::{band_energy_ratio, stats::linear_fit_slope, Spectrogram, EPSILON};

/// Rumble band (Hz)
pub const RUMBLE_BAND: (f32, f32) = (20.0, 80.0);
/// Mud band (Hz)
pub const MUD_BAND: (f32, f32) = (200.0, 500.0);
/// Boxiness band (Hz)
pub const BOXY_BAND: (f32, f32) = (500.0, 1000.0);
/// Harshness band (Hz)
pub const HARSH_BAND: (f32, f32) = (2000.0, 5000.0);
/// Sibilance band (Hz)
pub const SIBILANCE_BAND: (f32, f32) = (5000.0, 10_000.0);

/// Band energy ratios and spectral tilt of a spectrogram
///
/// Ratios come from the time-averaged power spectrum with DC excluded from the total.
/// Tilt is the least-squares slope of log10 mean magnitude against log10 frequency.
///
/// # Errors
///
/// Returns `AnalysisError::ExtractionFailure` when the spectrum carries no energy
pub fn measure_spectral_balance(spectrogram: &Spectrogram) -> Result<SpectralMetrics, AnalysisError> {
    let power = spectrogram.mean_power();
    let resolution = spectrogram.resolution_hz();

    let ratio = |(lo, hi): (f32, f32)| {
        band_energy_ratio(&power, resolution, lo, hi)
            .ok_or_else(|| AnalysisError::extraction("bands", "spectrum carries no energy"))
    };

    let bands = BandEnergies {
        rumble: ratio(RUMBLE_BAND)?,
        mud: ratio(MUD_BAND)?,
        boxy: ratio(BOXY_BAND)?,
        harsh: ratio(HARSH_BAND)?,
        sibilance: ratio(SIBILANCE_BAND)?,
    };

    let spectral_tilt = spectral_tilt(spectrogram).unwrap_or(0.0);

    log::debug!(
        "Bands: rumble={:.3}, mud={:.3}, boxy={:.3}, harsh={:.3}, sibilance={:.3}, tilt={:.3}",
        bands.rumble,
        bands.mud,
        bands.boxy,
        bands.harsh,
        bands.sibilance,
        spectral_tilt
    );

    Ok(SpectralMetrics {
        bands,
        spectral_tilt,
    })
}

/// Slope of log10 magnitude against log10 frequency, DC excluded
///
/// Returns `None` with fewer than two non-DC bins.
pub fn spectral_tilt(spectrogram: &Spectrogram) -> Option<f32> {
    let magnitude = spectrogram.mean_magnitude();
    let (log_freqs, log_mags): (Vec<f32>, Vec<f32>) = magnitude
        .iter()
        .enumerate()
        .skip(1)
        .map(|(bin, &m)| {
            (
                spectrogram.bin_frequency(bin).log10(),
                m.max(EPSILON).log10(),
            )
        })
        .unzip();
    linear_fit_slope(&log_freqs, &log_mags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_signals::{noise, sine};

    fn spectrogram(samples: &[f32]) -> Spectrogram {
        Spectrogram::compute(samples, 48_000, 2048, 512).unwrap()
    }

    #[test]
    fn test_mud_tone() {
        let samples = sine(350.0, 48_000, 1.0, 0.5);
        let metrics = measure_spectral_balance(&spectrogram(&samples)).unwrap();
        assert!(metrics.bands.mud > 0.95, "mud {}", metrics.bands.mud);
        assert!(metrics.bands.sibilance < 0.01);
        assert!(metrics.bands.harsh < 0.01);
    }

    #[test]
    fn test_ratios_bounded() {
        let samples = noise(48_000, 0.5, 7);
        let metrics = measure_spectral_balance(&spectrogram(&samples)).unwrap();
        for (name, value) in metrics.bands.iter() {
            assert!((0.0..=1.0).contains(&value), "{} = {}", name, value);
        }
        // White noise: 5 kHz of 24 kHz bandwidth
        assert!((metrics.bands.sibilance - 5.0 / 24.0).abs() < 0.03);
    }

    #[test]
    fn test_white_noise_is_flat_low_tone_is_dark() {
        let flat = measure_spectral_balance(&spectrogram(&noise(48_000, 0.5, 3))).unwrap();
        assert!(flat.spectral_tilt.abs() < 0.3, "tilt {}", flat.spectral_tilt);

        let low = measure_spectral_balance(&spectrogram(&sine(100.0, 48_000, 1.0, 0.5))).unwrap();
        assert!(low.spectral_tilt < flat.spectral_tilt);
    }

    #[test]
    fn test_silence_fails() {
        let samples = vec![0.0f32; 48_000];
        assert!(measure_spectral_balance(&spectrogram(&samples)).is_err());
    }
}
