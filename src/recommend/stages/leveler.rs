//! Leveler

use super::{LevelerMode, StageParams, StageRole, StageTarget};
use crate::analysis::result::FeatureSet;
use crate::config::AnalysisConfig;
use crate::recommend::style::ChainStyle;

fn settings(style: ChainStyle) -> (f32, LevelerMode) {
    match style {
        ChainStyle::Clean => (2.0, LevelerMode::Gentle),
        ChainStyle::PopAiry => (3.0, LevelerMode::Medium),
        ChainStyle::WarmAnalog => (2.5, LevelerMode::Gentle),
        ChainStyle::AggressiveRap => (4.0, LevelerMode::Fast),
        ChainStyle::IntimateRnb => (2.0, LevelerMode::Gentle),
    }
}

/// Gain rider sized purely by style
pub fn leveler(_features: &FeatureSet, style: ChainStyle, _config: &AnalysisConfig) -> StageTarget {
    let (target_gr_db, mode) = settings(style);
    StageTarget {
        role: StageRole::Leveler,
        enabled: true,
        params: StageParams::Leveler { target_gr_db, mode },
        rationale: format!("{:?} riding, {:.1} dB for {}", mode, target_gr_db, style),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::test_features::neutral_vocal;

    #[test]
    fn test_rap_levels_fast() {
        let stage = leveler(&neutral_vocal(), ChainStyle::AggressiveRap, &AnalysisConfig::default());
        assert_eq!(
            stage.params,
            StageParams::Leveler {
                target_gr_db: 4.0,
                mode: LevelerMode::Fast
            }
        );
    }
}
