//! Primary and glue compression

use serde::{Deserialize, Serialize};

use super::{CompressorParams, StageParams, StageRole, StageTarget};
use crate::analysis::result::FeatureSet;
use crate::config::AnalysisConfig;
use crate::recommend::style::ChainStyle;

/// How dynamic the source is, from its crest factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrestTier {
    /// crest <= `crest_moderate_db`
    Low,
    /// `crest_moderate_db` < crest <= `crest_threshold_db`
    Moderate,
    /// crest > `crest_threshold_db`
    High,
}

impl CrestTier {
    /// Classify a crest factor
    pub fn from_crest(crest_db: f32, config: &AnalysisConfig) -> Self {
        if crest_db > config.crest_threshold_db {
            CrestTier::High
        } else if crest_db > config.crest_moderate_db {
            CrestTier::Moderate
        } else {
            CrestTier::Low
        }
    }

    /// Gain reduction to aim for (dB)
    pub fn target_gr_db(&self) -> f32 {
        match self {
            CrestTier::Low => 3.0,
            CrestTier::Moderate => 5.0,
            CrestTier::High => 7.0,
        }
    }
}

/// (ratio, attack ms, release ms) by style and crest tier
fn primary_settings(style: ChainStyle, tier: CrestTier) -> (f32, f32, f32) {
    use ChainStyle::*;
    use CrestTier::*;
    match (style, tier) {
        (Clean, Low) => (2.0, 15.0, 120.0),
        (Clean, Moderate) => (2.5, 10.0, 100.0),
        (Clean, High) => (3.0, 8.0, 80.0),
        (PopAiry, Low) => (2.5, 10.0, 100.0),
        (PopAiry, Moderate) => (3.0, 8.0, 80.0),
        (PopAiry, High) => (4.0, 5.0, 60.0),
        (WarmAnalog, Low) => (2.0, 20.0, 150.0),
        (WarmAnalog, Moderate) => (2.5, 15.0, 120.0),
        (WarmAnalog, High) => (3.5, 10.0, 100.0),
        (AggressiveRap, Low) => (3.0, 5.0, 60.0),
        (AggressiveRap, Moderate) => (4.0, 3.0, 50.0),
        (AggressiveRap, High) => (6.0, 1.0, 40.0),
        (IntimateRnb, Low) => (2.0, 15.0, 150.0),
        (IntimateRnb, Moderate) => (2.5, 12.0, 120.0),
        (IntimateRnb, High) => (3.0, 10.0, 100.0),
    }
}

/// (ratio, attack ms, release ms) of the glue stage
fn glue_settings(style: ChainStyle) -> (f32, f32, f32) {
    match style {
        ChainStyle::Clean => (1.5, 30.0, 100.0),
        ChainStyle::PopAiry => (2.0, 30.0, 100.0),
        ChainStyle::WarmAnalog => (1.5, 30.0, 300.0),
        ChainStyle::AggressiveRap => (4.0, 10.0, 100.0),
        ChainStyle::IntimateRnb => (2.0, 30.0, 200.0),
    }
}

/// Gain reduction the glue stage aims for (dB)
const GLUE_TARGET_GR_DB: f32 = 2.0;

fn params(ratio: f32, attack_ms: f32, release_ms: f32, target_gr_db: f32) -> CompressorParams {
    CompressorParams {
        ratio,
        attack_ms,
        release_ms,
        target_gr_db,
        output_gain_db: target_gr_db - 1.0,
    }
}

/// Main vocal compressor, sized by crest factor; disabled without a vocal
pub fn primary_compressor(
    features: &FeatureSet,
    style: ChainStyle,
    config: &AnalysisConfig,
) -> StageTarget {
    let crest = features.dynamics.crest_db;
    let tier = CrestTier::from_crest(crest, config);
    let (ratio, attack_ms, release_ms) = primary_settings(style, tier);
    let enabled = features.vocal.present;

    let rationale = if enabled {
        format!(
            "crest {:.1} dB -> {:?} tier, {:.0} dB gain reduction at {}:1 for {}",
            crest,
            tier,
            tier.target_gr_db(),
            ratio,
            style
        )
    } else {
        "no vocal detected".to_string()
    };

    StageTarget {
        role: StageRole::PrimaryCompressor,
        enabled,
        params: StageParams::Compressor(params(ratio, attack_ms, release_ms, tier.target_gr_db())),
        rationale,
    }
}

/// Glue compressor; disabled for the clean style
pub fn glue_compressor(
    _features: &FeatureSet,
    style: ChainStyle,
    _config: &AnalysisConfig,
) -> StageTarget {
    let (ratio, attack_ms, release_ms) = glue_settings(style);
    let enabled = style != ChainStyle::Clean;
    let rationale = if enabled {
        format!("{} glue at {}:1, {:.0} ms release", style, ratio, release_ms)
    } else {
        "clean style keeps the bus uncompressed".to_string()
    };

    StageTarget {
        role: StageRole::GlueCompressor,
        enabled,
        params: StageParams::Compressor(params(ratio, attack_ms, release_ms, GLUE_TARGET_GR_DB)),
        rationale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::test_features::neutral_vocal;

    fn compressor(stage: &StageTarget) -> CompressorParams {
        match stage.params {
            StageParams::Compressor(p) => p,
            ref other => panic!("unexpected params {:?}", other),
        }
    }

    #[test]
    fn test_high_crest_aggressive_rap() {
        let mut features = neutral_vocal();
        features.dynamics.crest_db = 16.5;
        let stage = primary_compressor(&features, ChainStyle::AggressiveRap, &AnalysisConfig::default());
        assert!(stage.enabled);
        let p = compressor(&stage);
        assert_eq!(p.target_gr_db, 7.0);
        assert_eq!(p.ratio, 6.0);
        assert_eq!(p.attack_ms, 1.0);
        assert_eq!(p.release_ms, 40.0);
        assert_eq!(p.output_gain_db, 6.0);
    }

    #[test]
    fn test_crest_tiers() {
        let config = AnalysisConfig::default();
        assert_eq!(CrestTier::from_crest(8.0, &config), CrestTier::Low);
        assert_eq!(CrestTier::from_crest(10.0, &config), CrestTier::Low);
        assert_eq!(CrestTier::from_crest(12.0, &config), CrestTier::Moderate);
        assert_eq!(CrestTier::from_crest(14.0, &config), CrestTier::Moderate);
        assert_eq!(CrestTier::from_crest(14.1, &config), CrestTier::High);
    }

    #[test]
    fn test_no_vocal_disables_primary() {
        let mut features = neutral_vocal();
        features.vocal.present = false;
        let stage = primary_compressor(&features, ChainStyle::Clean, &AnalysisConfig::default());
        assert!(!stage.enabled);
    }

    #[test]
    fn test_glue_disabled_for_clean_only() {
        let config = AnalysisConfig::default();
        for style in ChainStyle::ALL {
            let stage = glue_compressor(&neutral_vocal(), style, &config);
            assert_eq!(stage.enabled, style != ChainStyle::Clean, "{}", style);
        }
        let warm = compressor(&glue_compressor(&neutral_vocal(), ChainStyle::WarmAnalog, &config));
        assert_eq!((warm.ratio, warm.attack_ms, warm.release_ms), (1.5, 30.0, 300.0));
    }
}
