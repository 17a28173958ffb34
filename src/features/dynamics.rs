//! Level and crest factor

use crate::analysis::result::DynamicsMetrics;
use crate::error::AnalysisError;
use crate::features::spectral::EPSILON;

/// Level reported for a signal at or below [`EPSILON`] (dBFS)
pub fn silence_db() -> f32 {
    20.0 * EPSILON.log10()
}

impl Default for DynamicsMetrics {
    fn default() -> Self {
        let floor = silence_db();
        Self {
            rms_db: floor,
            peak_dbfs: floor,
            crest_db: 0.0,
        }
    }
}

/// Compute RMS level, sample peak and crest factor
///
/// Levels are floored at [`EPSILON`] before conversion, so silence yields finite values
/// and a crest factor of 0 dB.
///
/// # Errors
///
/// Returns `AnalysisError::ExtractionFailure` for an empty buffer
pub fn measure_dynamics(samples: &[f32]) -> Result<DynamicsMetrics, AnalysisError> {
    if samples.is_empty() {
        return Err(AnalysisError::extraction("dynamics", "empty audio samples"));
    }

    let sum_sq: f64 = samples.iter().map(|&x| (x as f64) * (x as f64)).sum();
    let rms = (sum_sq / samples.len() as f64).sqrt() as f32;
    let peak = samples.iter().map(|x| x.abs()).fold(0.0f32, f32::max);

    let rms_db = 20.0 * rms.max(EPSILON).log10();
    let peak_dbfs = 20.0 * peak.max(EPSILON).log10();
    let crest_db = peak_dbfs - rms_db;

    log::debug!(
        "Dynamics: rms={:.2} dB, peak={:.2} dBFS, crest={:.2} dB",
        rms_db,
        peak_dbfs,
        crest_db
    );

    Ok(DynamicsMetrics {
        rms_db,
        peak_dbfs,
        crest_db,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_signals::sine;

    #[test]
    fn test_sine_crest_factor() {
        // Sine: peak/rms = sqrt(2) -> 3.01 dB
        let samples = sine(1000.0, 48_000, 1.0, 0.5);
        let d = measure_dynamics(&samples).unwrap();
        assert!((d.crest_db - 3.01).abs() < 0.05, "crest {:.3}", d.crest_db);
        assert!((d.peak_dbfs + 6.02).abs() < 0.05);
        assert!((d.crest_db - (d.peak_dbfs - d.rms_db)).abs() < 1e-6);
    }

    #[test]
    fn test_impulse_is_highly_dynamic() {
        let mut samples = vec![0.0f32; 48_000];
        samples[100] = 1.0;
        let d = measure_dynamics(&samples).unwrap();
        assert!(d.crest_db > 40.0);
        assert_eq!(d.peak_dbfs, 0.0);
    }

    #[test]
    fn test_silence_is_finite() {
        let d = measure_dynamics(&[0.0; 1024]).unwrap();
        assert!(d.rms_db.is_finite() && d.peak_dbfs.is_finite());
        assert_eq!(d.crest_db, 0.0);
        assert_eq!(d, DynamicsMetrics::default());
    }

    #[test]
    fn test_empty_fails() {
        assert!(measure_dynamics(&[]).is_err());
    }
}
