//! Presence and air enhancement

use super::{StageParams, StageRole, StageTarget};
use crate::analysis::result::FeatureSet;
use crate::config::AnalysisConfig;
use crate::recommend::style::ChainStyle;

/// Upper bound for either lift (dB)
pub const MAX_ENHANCEMENT_DB: f32 = 4.0;

/// Base (presence dB, brilliance dB) per style
fn base_settings(style: ChainStyle) -> (f32, f32) {
    match style {
        ChainStyle::Clean => (1.0, 0.5),
        ChainStyle::PopAiry => (2.5, 3.0),
        ChainStyle::WarmAnalog => (0.5, 0.0),
        ChainStyle::AggressiveRap => (2.0, 1.5),
        ChainStyle::IntimateRnb => (1.0, 1.0),
    }
}

/// Style base lift, adjusted for source tilt and sibilance
pub fn enhancer(features: &FeatureSet, style: ChainStyle, config: &AnalysisConfig) -> StageTarget {
    let (mut presence, mut brilliance) = base_settings(style);
    let tilt = features.spectral.spectral_tilt;
    let sibilance = features.spectral.bands.sibilance;
    let mut reasons = vec![format!("{} base", style)];

    if style.is_bright() && tilt > config.bright_tilt {
        presence *= 0.5;
        brilliance *= 0.5;
        reasons.push(format!("source already bright (tilt {:.2} > {:.2})", tilt, config.bright_tilt));
    }
    if tilt < config.dark_tilt {
        presence += 0.5;
        brilliance += 0.5;
        reasons.push(format!("dark source (tilt {:.2} < {:.2})", tilt, config.dark_tilt));
    }
    if sibilance > config.sibilance_threshold {
        let scale = config.sibilance_threshold / sibilance;
        presence *= scale;
        brilliance *= scale;
        reasons.push(format!(
            "sibilance {:.2} > {:.2} scales lift by {:.2}",
            sibilance, config.sibilance_threshold, scale
        ));
    }

    let presence_db = presence.clamp(0.0, MAX_ENHANCEMENT_DB);
    let brilliance_db = brilliance.clamp(0.0, MAX_ENHANCEMENT_DB);

    StageTarget {
        role: StageRole::Enhancer,
        enabled: presence_db > 0.0 || brilliance_db > 0.0,
        params: StageParams::Enhancer {
            presence_db,
            brilliance_db,
        },
        rationale: reasons.join("; "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::test_features::neutral_vocal;

    fn lifts(stage: &StageTarget) -> (f32, f32) {
        match stage.params {
            StageParams::Enhancer {
                presence_db,
                brilliance_db,
            } => (presence_db, brilliance_db),
            ref other => panic!("unexpected params {:?}", other),
        }
    }

    #[test]
    fn test_bright_source_halves_bright_style() {
        let mut features = neutral_vocal();
        features.spectral.spectral_tilt = -0.5;
        let stage = enhancer(&features, ChainStyle::PopAiry, &AnalysisConfig::default());
        assert_eq!(lifts(&stage), (1.25, 1.5));

        // Non-bright styles keep their base
        let stage = enhancer(&features, ChainStyle::Clean, &AnalysisConfig::default());
        assert_eq!(lifts(&stage), (1.0, 0.5));
    }

    #[test]
    fn test_dark_source_adds_lift() {
        let mut features = neutral_vocal();
        features.spectral.spectral_tilt = -3.0;
        let stage = enhancer(&features, ChainStyle::WarmAnalog, &AnalysisConfig::default());
        assert_eq!(lifts(&stage), (1.0, 0.5));
        assert!(stage.enabled);
    }

    #[test]
    fn test_sibilance_scales_down() {
        let mut features = neutral_vocal();
        features.spectral.bands.sibilance = 1.0;
        let stage = enhancer(&features, ChainStyle::IntimateRnb, &AnalysisConfig::default());
        let (presence, brilliance) = lifts(&stage);
        assert!((presence - 0.55).abs() < 1e-6);
        assert!((brilliance - 0.55).abs() < 1e-6);
    }
}
