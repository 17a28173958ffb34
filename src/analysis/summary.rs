//! Flat feature summary carried inside a recommendation

use serde::{Deserialize, Serialize};

use super::result::FeatureSet;

/// Headline metrics of a feature set, flattened for report layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSummary {
    /// Key in musical notation ("C", "F#m")
    pub key: String,
    /// Key confidence (0.0-1.0)
    pub key_confidence: f32,
    /// Tempo in BPM
    pub tempo_bpm: f32,
    /// Integrated loudness in LUFS
    pub integrated_lufs: f32,
    /// Crest factor in dB
    pub crest_db: f32,
    /// Spectral tilt
    pub spectral_tilt: f32,
    /// Reverb tail in seconds
    pub reverb_tail_s: f32,
    /// Whether a vocal was detected
    pub vocal_present: bool,
}

impl From<&FeatureSet> for FeatureSummary {
    fn from(features: &FeatureSet) -> Self {
        Self {
            key: features.key.key.name(),
            key_confidence: features.key.confidence,
            tempo_bpm: features.tempo_bpm,
            integrated_lufs: features.loudness.integrated_lufs,
            crest_db: features.dynamics.crest_db,
            spectral_tilt: features.spectral.spectral_tilt,
            reverb_tail_s: features.reverb_tail_s,
            vocal_present: features.vocal.present,
        }
    }
}
