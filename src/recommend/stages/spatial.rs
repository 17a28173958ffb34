//! Reverb send

use super::{IrCategory, StageParams, StageRole, StageTarget};
use crate::analysis::result::FeatureSet;
use crate::config::AnalysisConfig;
use crate::recommend::style::ChainStyle;

/// Wet level multiplier for sources that already carry a long tail
const WET_SOURCE_SCALE: f32 = 0.7;

/// (IR family, wet level, pre-delay ms) per style
fn settings(style: ChainStyle) -> (IrCategory, f32, f32) {
    match style {
        ChainStyle::Clean => (IrCategory::SmallRoom, 0.12, 10.0),
        ChainStyle::PopAiry => (IrCategory::Plate, 0.22, 30.0),
        ChainStyle::WarmAnalog => (IrCategory::Chamber, 0.18, 20.0),
        ChainStyle::AggressiveRap => (IrCategory::ShortRoom, 0.10, 5.0),
        ChainStyle::IntimateRnb => (IrCategory::Hall, 0.25, 40.0),
    }
}

/// Style-driven space, pulled back when the source is already wet
pub fn spatial(features: &FeatureSet, style: ChainStyle, config: &AnalysisConfig) -> StageTarget {
    let (ir, mut wet, pre_delay_ms) = settings(style);
    let tail = features.reverb_tail_s;
    let mut rationale = format!("{:?} for {}", ir, style);

    if tail > config.reverb_tail_threshold_s {
        wet *= WET_SOURCE_SCALE;
        rationale.push_str(&format!(
            "; source tail {:.2} s > {:.2} s, wet reduced 30%",
            tail, config.reverb_tail_threshold_s
        ));
    }

    StageTarget {
        role: StageRole::Spatial,
        enabled: true,
        params: StageParams::Spatial {
            ir,
            wet,
            pre_delay_ms,
        },
        rationale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::test_features::neutral_vocal;

    fn wet(stage: &StageTarget) -> f32 {
        match stage.params {
            StageParams::Spatial { wet, .. } => wet,
            ref other => panic!("unexpected params {:?}", other),
        }
    }

    #[test]
    fn test_long_tail_reduces_wet() {
        let config = AnalysisConfig::default();
        let mut features = neutral_vocal();
        let dry = wet(&spatial(&features, ChainStyle::IntimateRnb, &config));
        assert_eq!(dry, 0.25);

        features.reverb_tail_s = 1.5;
        let reduced = wet(&spatial(&features, ChainStyle::IntimateRnb, &config));
        assert!((reduced - 0.175).abs() < 1e-6);

        features.reverb_tail_s = 1.0;
        assert_eq!(wet(&spatial(&features, ChainStyle::IntimateRnb, &config)), 0.25);
    }
}
