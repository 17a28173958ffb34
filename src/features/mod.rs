//! Feature extraction modules
//!
//! This module contains the seven analyzers and the shared spectral toolkit:
//! - Tempo (onset autocorrelation with a spectral-flux fallback)
//! - Key (chroma + Krumhansl-Schmuckler templates)
//! - Loudness (ITU-R BS.1770-4)
//! - Dynamics (RMS, peak, crest factor)
//! - Spectral balance (band ratios, tilt)
//! - Reverb tail
//! - Vocal descriptors
//!
//! Every analyzer returns a `Result`; [`extract_features`] resolves failures through
//! [`or_default`], so extraction always yields a complete [`FeatureSet`].

pub mod bands;
pub mod chroma;
pub mod dynamics;
pub mod key;
pub mod loudness;
pub mod reverb;
pub mod spectral;
pub mod tempo;
pub mod vocal;

#[cfg(test)]
pub(crate) mod test_signals;

use crate::analysis::result::{DynamicsMetrics, FeatureSet, KeyEstimate, LoudnessMetrics, SpectralMetrics, VocalMetrics};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use spectral::Spectrogram;

/// Unwrap an analyzer result, logging the failure and substituting `default`
pub fn or_default<T: std::fmt::Debug>(analyzer: &str, result: Result<T, AnalysisError>, default: T) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            log::warn!("{} analysis failed ({}), using default {:?}", analyzer, e, default);
            default
        }
    }
}

/// Run every analyzer over prepared samples
///
/// `samples` must already be validated and sanitized (see
/// [`crate::preprocessing::prepare_samples`]). Always returns a finite feature set.
pub fn extract_features(samples: &[f32], sample_rate: u32, config: &AnalysisConfig) -> FeatureSet {
    log::debug!(
        "Extracting features: {} samples at {} Hz",
        samples.len(),
        sample_rate
    );

    let tempo_bpm = or_default(
        "tempo",
        tempo::estimate_tempo(samples, sample_rate, config),
        tempo::DEFAULT_BPM,
    );

    let key = or_default(
        "key",
        key::estimate_key(samples, sample_rate, config),
        KeyEstimate::default(),
    );

    let loudness = loudness::measure_loudness(samples, sample_rate).unwrap_or_else(|e| {
        let estimate = loudness::rms_loudness_estimate(samples);
        log::warn!("loudness analysis failed ({}), using RMS estimate {:.2} LUFS", e, estimate);
        LoudnessMetrics {
            integrated_lufs: estimate,
            short_term_lufs: estimate,
        }
    });

    let dynamics = or_default(
        "dynamics",
        dynamics::measure_dynamics(samples),
        DynamicsMetrics::default(),
    );

    let spectrogram = Spectrogram::compute(samples, sample_rate, config.frame_size, config.hop_size);

    let spectral = or_default(
        "bands",
        spectrogram
            .as_ref()
            .map_err(Clone::clone)
            .and_then(bands::measure_spectral_balance),
        SpectralMetrics::default(),
    );

    let reverb_tail_s = or_default(
        "reverb",
        reverb::estimate_reverb_tail(samples, sample_rate),
        reverb::DEFAULT_REVERB_TAIL_S,
    );

    let vocal = or_default(
        "vocal",
        spectrogram
            .as_ref()
            .map_err(Clone::clone)
            .and_then(|s| vocal::analyze_vocal(s, config)),
        VocalMetrics::default(),
    );

    let features = FeatureSet {
        tempo_bpm,
        key,
        loudness,
        dynamics,
        spectral,
        reverb_tail_s,
        vocal,
        duration_seconds: samples.len() as f32 / sample_rate.max(1) as f32,
    };

    log::debug!(
        "Features: {:.1} BPM, key {} ({:.2}), {:.1} LUFS, crest {:.1} dB, vocal={}",
        features.tempo_bpm,
        features.key.key.name(),
        features.key.confidence,
        features.loudness.integrated_lufs,
        features.dynamics.crest_db,
        features.vocal.present
    );

    features
}
