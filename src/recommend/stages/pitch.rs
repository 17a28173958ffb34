//! Pitch correction

use super::{StageParams, StageRole, StageTarget};
use crate::analysis::result::FeatureSet;
use crate::config::AnalysisConfig;
use crate::recommend::scale::scale_mask_for_key;
use crate::recommend::style::ChainStyle;

/// Correction strength grows with instability: `amount = 0.3 + 0.4·(1 - s)`,
/// `speed = 0.4 + 0.4·(1 - s)`. Enabled below `pitch_correction_stability`.
pub fn pitch_correction(
    features: &FeatureSet,
    _style: ChainStyle,
    config: &AnalysisConfig,
) -> StageTarget {
    let stability = features.vocal.note_stability;
    let instability = 1.0 - stability;
    let amount = (0.3 + 0.4 * instability).clamp(0.0, 1.0);
    let speed = (0.4 + 0.4 * instability).clamp(0.0, 1.0);
    let enabled = stability < config.pitch_correction_stability;

    let scale = scale_mask_for_key(&features.key, config.key_confidence_threshold);
    let key = features.key.key.name();

    let scale_note = if scale.is_chromatic() {
        format!(
            "key confidence {:.2} < {:.2}, chromatic scale",
            features.key.confidence, config.key_confidence_threshold
        )
    } else {
        format!("{} scale (confidence {:.2})", key, features.key.confidence)
    };
    let rationale = if enabled {
        format!(
            "note stability {:.2} < {:.2}; {}",
            stability, config.pitch_correction_stability, scale_note
        )
    } else {
        format!(
            "note stability {:.2} >= {:.2}, no correction needed",
            stability, config.pitch_correction_stability
        )
    };

    StageTarget {
        role: StageRole::PitchCorrection,
        enabled,
        params: StageParams::PitchCorrection {
            amount,
            speed,
            key,
            scale,
        },
        rationale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::result::{Key, KeyEstimate};
    use crate::recommend::test_features::neutral_vocal;

    #[test]
    fn test_stable_vocal_disabled() {
        let features = neutral_vocal();
        let stage = pitch_correction(&features, ChainStyle::Clean, &AnalysisConfig::default());
        assert!(!stage.enabled);
    }

    #[test]
    fn test_unstable_vocal_strength() {
        let mut features = neutral_vocal();
        features.vocal.note_stability = 0.5;
        features.key = KeyEstimate {
            key: Key::Minor(9),
            confidence: 0.8,
        };
        let stage = pitch_correction(&features, ChainStyle::PopAiry, &AnalysisConfig::default());
        assert!(stage.enabled);
        match stage.params {
            StageParams::PitchCorrection {
                amount,
                speed,
                key,
                scale,
            } => {
                assert!((amount - 0.5).abs() < 1e-6);
                assert!((speed - 0.6).abs() < 1e-6);
                assert_eq!(key, "Am");
                assert_eq!(scale.count(), 7);
            }
            other => panic!("unexpected params {:?}", other),
        }
    }

    #[test]
    fn test_boundary_stability_not_corrected() {
        let mut features = neutral_vocal();
        features.vocal.note_stability = 0.8;
        let stage = pitch_correction(&features, ChainStyle::Clean, &AnalysisConfig::default());
        assert!(!stage.enabled);
    }
}
