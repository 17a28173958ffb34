//! Style classification
//!
//! A deterministic weighted score over five processing archetypes. With no vocal present
//! only the no-vocal bonus applies; otherwise eight threshold rules run in a fixed order.
//! All comparisons are strict, so a metric sitting exactly on its threshold never fires.
//!
//! Ties go to the earliest archetype in [`ChainStyle::PRIORITY`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::result::FeatureSet;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;

/// Overall processing archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChainStyle {
    /// Transparent, natural processing
    Clean,
    /// Bright, polished, airy top end
    PopAiry,
    /// Rounded tone, slower compression
    WarmAnalog,
    /// Upfront, dense, fast compression
    AggressiveRap,
    /// Close, soft and spacious
    IntimateRnb,
}

impl ChainStyle {
    /// All archetypes in declaration order
    pub const ALL: [ChainStyle; 5] = [
        ChainStyle::Clean,
        ChainStyle::PopAiry,
        ChainStyle::WarmAnalog,
        ChainStyle::AggressiveRap,
        ChainStyle::IntimateRnb,
    ];

    /// Tie-break order for equal scores (earliest wins)
    pub const PRIORITY: [ChainStyle; 5] = [
        ChainStyle::Clean,
        ChainStyle::WarmAnalog,
        ChainStyle::PopAiry,
        ChainStyle::IntimateRnb,
        ChainStyle::AggressiveRap,
    ];

    /// Wire name ("pop-airy", ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainStyle::Clean => "clean",
            ChainStyle::PopAiry => "pop-airy",
            ChainStyle::WarmAnalog => "warm-analog",
            ChainStyle::AggressiveRap => "aggressive-rap",
            ChainStyle::IntimateRnb => "intimate-rnb",
        }
    }

    /// One-line description of the sound
    pub fn description(&self) -> &'static str {
        match self {
            ChainStyle::Clean => "Transparent, natural vocal that stays close to the source",
            ChainStyle::PopAiry => "Bright, polished vocal with an airy top end and steady level",
            ChainStyle::WarmAnalog => "Smooth, rounded vocal with relaxed analog-style compression",
            ChainStyle::AggressiveRap => "Upfront, dense vocal with fast, heavy compression",
            ChainStyle::IntimateRnb => "Close, soft vocal sitting in a lush space",
        }
    }

    /// Heavy-handed processing archetype
    pub fn is_aggressive(&self) -> bool {
        matches!(self, ChainStyle::AggressiveRap)
    }

    /// Archetypes that add top-end presence
    pub fn is_bright(&self) -> bool {
        matches!(self, ChainStyle::PopAiry | ChainStyle::AggressiveRap)
    }
}

impl fmt::Display for ChainStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChainStyle {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        ChainStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == normalized)
            .ok_or_else(|| AnalysisError::InvalidInput(format!("Unknown chain style: {:?}", s)))
    }
}

/// Accumulated score per archetype
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StyleScores {
    /// clean
    pub clean: f32,
    /// pop-airy
    pub pop_airy: f32,
    /// warm-analog
    pub warm_analog: f32,
    /// aggressive-rap
    pub aggressive_rap: f32,
    /// intimate-rnb
    pub intimate_rnb: f32,
}

impl StyleScores {
    /// Score of `style`
    pub fn get(&self, style: ChainStyle) -> f32 {
        match style {
            ChainStyle::Clean => self.clean,
            ChainStyle::PopAiry => self.pop_airy,
            ChainStyle::WarmAnalog => self.warm_analog,
            ChainStyle::AggressiveRap => self.aggressive_rap,
            ChainStyle::IntimateRnb => self.intimate_rnb,
        }
    }

    fn add(&mut self, style: ChainStyle, delta: f32) {
        let slot = match style {
            ChainStyle::Clean => &mut self.clean,
            ChainStyle::PopAiry => &mut self.pop_airy,
            ChainStyle::WarmAnalog => &mut self.warm_analog,
            ChainStyle::AggressiveRap => &mut self.aggressive_rap,
            ChainStyle::IntimateRnb => &mut self.intimate_rnb,
        };
        *slot += delta;
    }

    /// Highest-scoring archetype, ties resolved by [`ChainStyle::PRIORITY`]
    pub fn best(&self) -> ChainStyle {
        let mut best = ChainStyle::PRIORITY[0];
        for style in ChainStyle::PRIORITY.into_iter().skip(1) {
            if self.get(style) > self.get(best) {
                best = style;
            }
        }
        best
    }
}

/// Scores plus the rules that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct StyleClassification {
    /// Final scores
    pub scores: StyleScores,
    /// Human-readable description of each rule that fired, in evaluation order
    pub rules: Vec<String>,
}

impl StyleClassification {
    /// Winning archetype
    pub fn style(&self) -> ChainStyle {
        self.scores.best()
    }

    /// Deterministic explanation of the choice
    pub fn rationale(&self) -> String {
        let style = self.style();
        let basis = if self.rules.is_empty() {
            "no rule fired, priority order decides".to_string()
        } else {
            self.rules.join("; ")
        };
        format!(
            "{} scored {:.1}: {}. {}",
            style,
            self.scores.get(style),
            basis,
            style.description()
        )
    }
}

type Effects = &'static [(ChainStyle, f32)];

const NO_VOCAL: Effects = &[(ChainStyle::Clean, 2.0), (ChainStyle::WarmAnalog, 1.0)];
const SIBILANT: Effects = &[
    (ChainStyle::Clean, 1.0),
    (ChainStyle::WarmAnalog, 0.5),
    (ChainStyle::PopAiry, -1.0),
];
const MUDDY: Effects = &[
    (ChainStyle::Clean, 1.0),
    (ChainStyle::PopAiry, 0.5),
    (ChainStyle::WarmAnalog, -1.0),
];
const HARSH: Effects = &[
    (ChainStyle::WarmAnalog, 1.5),
    (ChainStyle::IntimateRnb, 0.5),
    (ChainStyle::AggressiveRap, -1.0),
];
const DYNAMIC: Effects = &[(ChainStyle::AggressiveRap, 1.5), (ChainStyle::PopAiry, 0.5)];
const LOUD: Effects = &[(ChainStyle::AggressiveRap, 1.0), (ChainStyle::PopAiry, 0.5)];
const WET: Effects = &[
    (ChainStyle::Clean, 1.0),
    (ChainStyle::IntimateRnb, 0.5),
    (ChainStyle::PopAiry, -0.5),
];
const UNSTABLE: Effects = &[(ChainStyle::PopAiry, 1.0), (ChainStyle::AggressiveRap, 0.5)];
const SLOW: Effects = &[(ChainStyle::IntimateRnb, 1.0), (ChainStyle::WarmAnalog, 0.5)];

/// Score every archetype against a feature set
pub fn score_styles(features: &FeatureSet, config: &AnalysisConfig) -> StyleClassification {
    let mut scores = StyleScores::default();
    let mut rules = Vec::new();
    let mut apply = |fired: bool, effects: Effects, description: String| {
        if fired {
            for &(style, delta) in effects {
                scores.add(style, delta);
            }
            rules.push(description);
        }
    };

    if !features.vocal.present {
        apply(true, NO_VOCAL, "no vocal detected".to_string());
        log::debug!("Style scores (no vocal): {:?}", scores);
        return StyleClassification { scores, rules };
    }

    let bands = &features.spectral.bands;
    apply(
        bands.sibilance > config.sibilance_threshold,
        SIBILANT,
        format!("sibilance {:.2} > {:.2}", bands.sibilance, config.sibilance_threshold),
    );
    apply(
        bands.mud > config.mud_threshold,
        MUDDY,
        format!("mud {:.2} > {:.2}", bands.mud, config.mud_threshold),
    );
    apply(
        bands.harsh > config.harsh_threshold,
        HARSH,
        format!("harshness {:.2} > {:.2}", bands.harsh, config.harsh_threshold),
    );
    apply(
        features.dynamics.crest_db > config.crest_threshold_db,
        DYNAMIC,
        format!(
            "crest {:.1} dB > {:.1} dB",
            features.dynamics.crest_db, config.crest_threshold_db
        ),
    );
    apply(
        features.loudness.integrated_lufs > config.loudness_threshold_lufs,
        LOUD,
        format!(
            "loudness {:.1} LUFS > {:.1} LUFS",
            features.loudness.integrated_lufs, config.loudness_threshold_lufs
        ),
    );
    apply(
        features.reverb_tail_s > config.reverb_tail_threshold_s,
        WET,
        format!(
            "reverb tail {:.2} s > {:.2} s",
            features.reverb_tail_s, config.reverb_tail_threshold_s
        ),
    );
    apply(
        features.vocal.note_stability < config.note_stability_threshold,
        UNSTABLE,
        format!(
            "note stability {:.2} < {:.2}",
            features.vocal.note_stability, config.note_stability_threshold
        ),
    );
    apply(
        features.tempo_bpm < config.slow_tempo_bpm,
        SLOW,
        format!(
            "tempo {:.1} BPM < {:.1} BPM",
            features.tempo_bpm, config.slow_tempo_bpm
        ),
    );

    log::debug!("Style scores: {:?} from {} rules", scores, rules.len());
    StyleClassification { scores, rules }
}

/// Pick the archetype for a feature set
pub fn classify_style(features: &FeatureSet, config: &AnalysisConfig) -> ChainStyle {
    score_styles(features, config).style()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::test_features::neutral_vocal;

    #[test]
    fn test_no_vocal_short_circuits() {
        let mut features = neutral_vocal();
        features.vocal.present = false;
        // Would fire several rules if evaluated
        features.spectral.bands.sibilance = 0.9;
        features.dynamics.crest_db = 20.0;

        let classification = score_styles(&features, &AnalysisConfig::default());
        assert_eq!(classification.style(), ChainStyle::Clean);
        assert_eq!(classification.scores.clean, 2.0);
        assert_eq!(classification.scores.warm_analog, 1.0);
        assert_eq!(classification.scores.pop_airy, 0.0);
        assert_eq!(classification.scores.aggressive_rap, 0.0);
        assert_eq!(classification.scores.intimate_rnb, 0.0);
    }

    #[test]
    fn test_neutral_vocal_ties_to_clean() {
        let classification = score_styles(&neutral_vocal(), &AnalysisConfig::default());
        assert!(classification.rules.is_empty());
        assert_eq!(classification.style(), ChainStyle::Clean);
    }

    #[test]
    fn test_threshold_equality_does_not_fire() {
        let mut features = neutral_vocal();
        features.spectral.bands.sibilance = 0.55;
        let classification = score_styles(&features, &AnalysisConfig::default());
        assert!(classification.rules.is_empty());
        assert_eq!(classification.scores, StyleScores::default());

        features.spectral.bands.sibilance = 0.56;
        let classification = score_styles(&features, &AnalysisConfig::default());
        assert_eq!(classification.scores.clean, 1.0);
        assert_eq!(classification.scores.pop_airy, -1.0);
    }

    #[test]
    fn test_dynamic_loud_vocal_is_aggressive() {
        let mut features = neutral_vocal();
        features.dynamics.crest_db = 16.5;
        features.loudness.integrated_lufs = -10.0;
        assert_eq!(
            classify_style(&features, &AnalysisConfig::default()),
            ChainStyle::AggressiveRap
        );
    }

    #[test]
    fn test_slow_harsh_vocal() {
        let mut features = neutral_vocal();
        features.spectral.bands.harsh = 0.7;
        features.tempo_bpm = 75.0;
        let classification = score_styles(&features, &AnalysisConfig::default());
        // warm-analog 2.0, intimate-rnb 1.5
        assert_eq!(classification.style(), ChainStyle::WarmAnalog);
        assert_eq!(classification.rules.len(), 2);
        let rationale = classification.rationale();
        assert!(rationale.starts_with("warm-analog scored 2.0"));
        assert!(rationale.ends_with(ChainStyle::WarmAnalog.description()));
    }

    #[test]
    fn test_priority_tie_break() {
        let scores = StyleScores {
            clean: 0.0,
            pop_airy: 1.0,
            warm_analog: 1.0,
            aggressive_rap: 1.0,
            intimate_rnb: 1.0,
        };
        assert_eq!(scores.best(), ChainStyle::WarmAnalog);

        let scores = StyleScores {
            intimate_rnb: 1.0,
            aggressive_rap: 1.0,
            ..StyleScores::default()
        };
        assert_eq!(scores.best(), ChainStyle::IntimateRnb);
    }

    #[test]
    fn test_style_names() {
        for style in ChainStyle::ALL {
            assert_eq!(style.as_str().parse::<ChainStyle>().unwrap(), style);
            assert_eq!(
                serde_json::to_string(&style).unwrap(),
                format!("\"{}\"", style)
            );
        }
        assert_eq!("Pop_Airy".parse::<ChainStyle>().unwrap(), ChainStyle::PopAiry);
        assert!("lofi".parse::<ChainStyle>().is_err());
        assert!(ChainStyle::PopAiry.is_bright() && !ChainStyle::Clean.is_bright());
        assert!(ChainStyle::AggressiveRap.is_aggressive());
    }
}
