//! # Vocal Chain DSP
//!
//! A feature-extraction and recommendation engine for vocal processing chains. Given a
//! mono recording it measures tempo, key, loudness, dynamics, spectral balance, reverb
//! and vocal character, picks a processing style, and produces target settings for an
//! eight-stage vocal chain.
//!
//! ## Features
//!
//! - **Tempo**: Energy-flux onsets with autocorrelation, spectral-flux fallback
//! - **Key**: Chroma matched against Krumhansl-Schmuckler templates
//! - **Loudness**: ITU-R BS.1770-4 integrated and short-term loudness
//! - **Recommendation**: Deterministic style scoring and per-stage parameter targets
//!
//! ## Quick Start
//!
//! ```no_run
//! use vocalchain_dsp::{analyze_audio, AnalysisConfig, StageRole};
//!
//! // Mono samples at 48 kHz, normalized to [-1.0, 1.0]
//! let samples: Vec<f32> = vec![0.0; 48_000 * 10];
//!
//! let recommendation = analyze_audio(&samples, 48_000, AnalysisConfig::default())?;
//!
//! println!("Style: {}", recommendation.style);
//! if let Some(stage) = recommendation.stage(StageRole::PrimaryCompressor) {
//!     println!("Compressor: {}", stage.rationale);
//! }
//! # Ok::<(), vocalchain_dsp::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Audio Input → Preparation → Feature Extraction → Style Classification → Stage Targets
//! ```
//!
//! Every step is a pure function of its inputs. Individual analyzers that cannot produce a
//! value fall back to documented defaults, so only invalid input or configuration errors
//! reach the caller.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;
pub mod recommend;

use std::time::Instant;

// Re-export main types
pub use analysis::result::{FeatureSet, Key, KeyEstimate, Mode};
pub use analysis::summary::FeatureSummary;
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use io::AudioBuffer;
pub use recommend::{ChainStyle, Recommendation, StageParams, StageRole, StageTarget, StyleScores};

/// Analysis engine bound to a validated configuration
///
/// The engine holds no mutable state; one instance can serve any number of threads.
///
/// # Example
///
/// ```
/// use vocalchain_dsp::{AnalysisConfig, AudioBuffer, ChainStyle, VocalChainEngine};
///
/// let engine = VocalChainEngine::new(AnalysisConfig::default())?;
/// let samples = vec![0.0f32; 48_000 * 2];
/// let recommendation = engine.analyze(&AudioBuffer::new(&samples, 48_000), None)?;
///
/// // Silence carries no vocal, which favours the clean style
/// assert_eq!(recommendation.style, ChainStyle::Clean);
/// # Ok::<(), vocalchain_dsp::AnalysisError>(())
/// ```
#[derive(Debug, Clone)]
pub struct VocalChainEngine {
    config: AnalysisConfig,
}

impl VocalChainEngine {
    /// Create an engine
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::ConfigurationError` if `config` fails validation
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Extract the feature set of a buffer
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` for an empty, rate-less, rate-mismatched or
    /// entirely non-finite buffer
    pub fn extract(&self, buffer: &AudioBuffer<'_>) -> Result<FeatureSet, AnalysisError> {
        let start_time = Instant::now();
        log::debug!(
            "Starting feature extraction: {} samples at {} Hz",
            buffer.len(),
            buffer.sample_rate()
        );

        let samples = preprocessing::prepare_samples(buffer, &self.config)?;
        let features = features::extract_features(&samples, buffer.sample_rate(), &self.config);

        log::debug!(
            "Feature extraction finished in {:.1} ms",
            start_time.elapsed().as_secs_f32() * 1000.0
        );
        Ok(features)
    }

    /// Recommend a chain for an existing feature set
    pub fn recommend(&self, features: &FeatureSet, style_override: Option<ChainStyle>) -> Recommendation {
        recommend::recommend(features, style_override, &self.config)
    }

    /// Extract features and recommend a chain in one call
    ///
    /// # Errors
    ///
    /// Same as [`VocalChainEngine::extract`]
    pub fn analyze(
        &self,
        buffer: &AudioBuffer<'_>,
        style_override: Option<ChainStyle>,
    ) -> Result<Recommendation, AnalysisError> {
        let features = self.extract(buffer)?;
        Ok(self.recommend(&features, style_override))
    }
}

/// Main analysis function
///
/// Analyzes mono samples and returns a complete chain recommendation.
///
/// # Arguments
///
/// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz (must match `config.sample_rate`)
/// * `config` - Analysis configuration parameters
///
/// # Errors
///
/// Returns `AnalysisError::ConfigurationError` for an invalid configuration and
/// `AnalysisError::InvalidInput` for an unusable buffer
///
/// # Example
///
/// ```
/// use vocalchain_dsp::{analyze_audio, AnalysisConfig};
///
/// let samples = vec![0.0f32; 48_000 * 3]; // 3 seconds of silence
/// let recommendation = analyze_audio(&samples, 48_000, AnalysisConfig::default())?;
/// assert_eq!(recommendation.stages.len(), 8);
/// # Ok::<(), vocalchain_dsp::AnalysisError>(())
/// ```
pub fn analyze_audio(
    samples: &[f32],
    sample_rate: u32,
    config: AnalysisConfig,
) -> Result<Recommendation, AnalysisError> {
    VocalChainEngine::new(config)?.analyze(&AudioBuffer::new(samples, sample_rate), None)
}

/// Extract the feature set of mono samples
///
/// # Errors
///
/// Same as [`analyze_audio`]
pub fn extract_features(
    samples: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
) -> Result<FeatureSet, AnalysisError> {
    VocalChainEngine::new(config.clone())?.extract(&AudioBuffer::new(samples, sample_rate))
}

/// Recommend a chain for a feature set, optionally forcing the style
///
/// # Errors
///
/// Returns `AnalysisError::ConfigurationError` for an invalid configuration
pub fn recommend(
    features: &FeatureSet,
    style_override: Option<ChainStyle>,
    config: &AnalysisConfig,
) -> Result<Recommendation, AnalysisError> {
    config.validate()?;
    Ok(recommend::recommend(features, style_override, config))
}
