//! Configuration parameters for feature extraction and recommendation
//!
//! Every threshold the style classifier and stage generators compare against lives here,
//! so tuning never requires recompiling. Configurations can be built in code (starting from
//! [`AnalysisConfig::default`]) or loaded from JSON, where missing fields take their defaults:
//!
//! ```
//! use vocalchain_dsp::AnalysisConfig;
//!
//! let config = AnalysisConfig::from_json_str(r#"{ "sibilance_threshold": 0.5 }"#)?;
//! assert_eq!(config.sibilance_threshold, 0.5);
//! assert_eq!(config.mud_threshold, 0.60);
//! # Ok::<(), vocalchain_dsp::AnalysisError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Analysis configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    // Input contract
    /// Expected sample rate of incoming buffers in Hz (default: 48000)
    pub sample_rate: u32,

    /// Maximum analysed duration in seconds (default: 180.0)
    /// Longer buffers are analysed on their leading portion only
    pub max_duration_s: f32,

    // STFT parameters
    /// Frame size for STFT (default: 2048)
    pub frame_size: usize,

    /// Hop size for STFT (default: 512)
    pub hop_size: usize,

    /// Frame size for chroma extraction (default: 8192)
    /// Larger than `frame_size` to resolve semitones in the low register
    pub chroma_frame_size: usize,

    // Tempo detection
    /// Minimum BPM considered by the primary tempo estimate (default: 60.0)
    pub min_bpm: f32,

    /// Maximum BPM considered by the primary tempo estimate (default: 200.0)
    pub max_bpm: f32,

    /// Onset threshold in dB relative to the strongest energy flux (default: -20.0)
    pub onset_threshold_db: f32,

    // Key detection
    /// Key confidence below which pitch correction uses a chromatic mask (default: 0.5)
    pub key_confidence_threshold: f32,

    // Vocal detection
    /// Minimum 300-3000 Hz energy ratio for a vocal to count as present (default: 0.3)
    pub vocal_presence_threshold: f32,

    // Style classification thresholds
    /// Sibilance (5-10 kHz ratio) above which de-essing rules trigger (default: 0.55)
    pub sibilance_threshold: f32,

    /// Mud (200-500 Hz ratio) above which mud rules trigger (default: 0.60)
    pub mud_threshold: f32,

    /// Harshness (2-5 kHz ratio) above which harshness rules trigger (default: 0.55)
    pub harsh_threshold: f32,

    /// Crest factor in dB above which the source counts as highly dynamic (default: 14.0)
    pub crest_threshold_db: f32,

    /// Integrated loudness above which the source counts as loud (default: -16.0 LUFS)
    pub loudness_threshold_lufs: f32,

    /// Reverb tail in seconds above which the source counts as already wet (default: 1.0)
    pub reverb_tail_threshold_s: f32,

    /// Note stability below which the performance counts as pitch-unstable (default: 0.70)
    pub note_stability_threshold: f32,

    /// Tempo below which the material counts as slow (default: 90.0 BPM)
    pub slow_tempo_bpm: f32,

    // Stage generation thresholds
    /// Note stability below which pitch correction is enabled (default: 0.8)
    pub pitch_correction_stability: f32,

    /// Rumble ratio that raises the high-pass to its middle tier (default: 0.05)
    pub rumble_threshold: f32,

    /// Rumble ratio that raises the high-pass to its top tier (default: 0.15)
    pub rumble_severe_threshold: f32,

    /// Boxiness (500-1000 Hz ratio) above which a boxy cut is added (default: 0.35)
    pub boxy_threshold: f32,

    /// Sibilance above which a static 7 kHz notch precedes the de-esser (default: 0.7)
    pub sibilance_notch_threshold: f32,

    /// Harshness at or below which bright styles receive a presence boost (default: 0.3)
    pub presence_boost_max_harsh: f32,

    /// Crest factor separating the low and moderate compression tiers (default: 10.0 dB)
    pub crest_moderate_db: f32,

    /// Spectral tilt above which the source counts as bright (default: -1.0)
    pub bright_tilt: f32,

    /// Spectral tilt below which the source counts as dark (default: -2.5)
    pub dark_tilt: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            max_duration_s: 180.0,
            frame_size: 2048,
            hop_size: 512,
            chroma_frame_size: 8192,
            min_bpm: 60.0,
            max_bpm: 200.0,
            onset_threshold_db: -20.0,
            key_confidence_threshold: 0.5,
            vocal_presence_threshold: 0.3,
            sibilance_threshold: 0.55,
            mud_threshold: 0.60,
            harsh_threshold: 0.55,
            crest_threshold_db: 14.0,
            loudness_threshold_lufs: -16.0,
            reverb_tail_threshold_s: 1.0,
            note_stability_threshold: 0.70,
            slow_tempo_bpm: 90.0,
            pitch_correction_stability: 0.8,
            rumble_threshold: 0.05,
            rumble_severe_threshold: 0.15,
            boxy_threshold: 0.35,
            sibilance_notch_threshold: 0.7,
            presence_boost_max_harsh: 0.3,
            crest_moderate_db: 10.0,
            bright_tilt: -1.0,
            dark_tilt: -2.5,
        }
    }
}

impl AnalysisConfig {
    /// Parse a configuration from JSON, defaulting missing fields, and validate it
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::ConfigurationError` for malformed JSON or out-of-range values
    pub fn from_json_str(json: &str) -> Result<Self, AnalysisError> {
        let config: AnalysisConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field against its sane range
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::ConfigurationError` naming the first offending field
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.sample_rate == 0 {
            return Err(config_error("sample_rate must be > 0"));
        }
        if !self.max_duration_s.is_finite() || self.max_duration_s <= 0.0 {
            return Err(config_error(format!(
                "max_duration_s must be positive, got {}",
                self.max_duration_s
            )));
        }
        if self.frame_size < 64 || self.chroma_frame_size < 64 {
            return Err(config_error("frame sizes must be at least 64 samples"));
        }
        if self.hop_size == 0 || self.hop_size > self.frame_size {
            return Err(config_error(format!(
                "hop_size must be in 1..={}, got {}",
                self.frame_size, self.hop_size
            )));
        }
        if !(self.min_bpm > 0.0 && self.min_bpm < self.max_bpm && self.max_bpm.is_finite()) {
            return Err(config_error(format!(
                "invalid BPM range [{}, {}]",
                self.min_bpm, self.max_bpm
            )));
        }

        let unit_ratios = [
            ("key_confidence_threshold", self.key_confidence_threshold),
            ("vocal_presence_threshold", self.vocal_presence_threshold),
            ("sibilance_threshold", self.sibilance_threshold),
            ("mud_threshold", self.mud_threshold),
            ("harsh_threshold", self.harsh_threshold),
            ("note_stability_threshold", self.note_stability_threshold),
            ("pitch_correction_stability", self.pitch_correction_stability),
            ("rumble_threshold", self.rumble_threshold),
            ("rumble_severe_threshold", self.rumble_severe_threshold),
            ("boxy_threshold", self.boxy_threshold),
            ("sibilance_notch_threshold", self.sibilance_notch_threshold),
            ("presence_boost_max_harsh", self.presence_boost_max_harsh),
        ];
        for (name, value) in unit_ratios {
            // NaN fails this check too
            if !(0.0..=1.0).contains(&value) {
                return Err(config_error(format!("{} must be in [0, 1], got {}", name, value)));
            }
        }
        if self.rumble_severe_threshold < self.rumble_threshold {
            return Err(config_error(
                "rumble_severe_threshold must not be below rumble_threshold",
            ));
        }

        let finite = [
            ("onset_threshold_db", self.onset_threshold_db),
            ("crest_threshold_db", self.crest_threshold_db),
            ("crest_moderate_db", self.crest_moderate_db),
            ("loudness_threshold_lufs", self.loudness_threshold_lufs),
            ("reverb_tail_threshold_s", self.reverb_tail_threshold_s),
            ("slow_tempo_bpm", self.slow_tempo_bpm),
            ("bright_tilt", self.bright_tilt),
            ("dark_tilt", self.dark_tilt),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(config_error(format!("{} must be finite", name)));
            }
        }
        if self.crest_threshold_db < 0.0 || self.crest_moderate_db < 0.0 {
            return Err(config_error("crest thresholds must be non-negative"));
        }
        if self.crest_moderate_db > self.crest_threshold_db {
            return Err(config_error(
                "crest_moderate_db must not exceed crest_threshold_db",
            ));
        }
        if self.reverb_tail_threshold_s < 0.0 {
            return Err(config_error("reverb_tail_threshold_s must be non-negative"));
        }
        if self.dark_tilt > self.bright_tilt {
            return Err(config_error("dark_tilt must not exceed bright_tilt"));
        }

        Ok(())
    }
}

fn config_error(msg: impl Into<String>) -> AnalysisError {
    AnalysisError::ConfigurationError(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_documented_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.sample_rate, 48_000);
        assert_eq!(config.max_duration_s, 180.0);
        assert_eq!(config.sibilance_threshold, 0.55);
        assert_eq!(config.mud_threshold, 0.60);
        assert_eq!(config.harsh_threshold, 0.55);
        assert_eq!(config.crest_threshold_db, 14.0);
        assert_eq!(config.loudness_threshold_lufs, -16.0);
        assert_eq!(config.reverb_tail_threshold_s, 1.0);
        assert_eq!(config.note_stability_threshold, 0.70);
    }

    #[test]
    fn test_negative_duration_cap_rejected() {
        let config = AnalysisConfig {
            max_duration_s: -1.0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_ratio_out_of_range_rejected() {
        let config = AnalysisConfig {
            sibilance_threshold: 1.5,
            ..AnalysisConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sibilance_threshold"));

        let config = AnalysisConfig {
            mud_threshold: f32::NAN,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_bpm_range_rejected() {
        let config = AnalysisConfig {
            min_bpm: 200.0,
            max_bpm: 60.0,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_defaults_missing_fields() {
        let config = AnalysisConfig::from_json_str(r#"{"harsh_threshold": 0.4}"#).unwrap();
        assert_eq!(config.harsh_threshold, 0.4);
        assert_eq!(config.sample_rate, 48_000);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        let result = AnalysisConfig::from_json_str(r#"{"max_duration_s": -5.0}"#);
        assert!(matches!(result, Err(AnalysisError::ConfigurationError(_))));

        let result = AnalysisConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(AnalysisError::ConfigurationError(_))));
    }

    #[test]
    fn test_json_roundtrip_preserves_config() {
        let config = AnalysisConfig {
            slow_tempo_bpm: 85.0,
            ..AnalysisConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(AnalysisConfig::from_json_str(&json).unwrap(), config);
    }
}
