//! Recommendation engine
//!
//! Turns a [`FeatureSet`] into a chain recommendation:
//! - Style classification (or a caller-supplied override)
//! - Eight stage targets in chain order
//! - Rationale strings and a flat feature summary

pub mod scale;
pub mod stages;
pub mod style;

use serde::{Deserialize, Serialize};

use crate::analysis::result::FeatureSet;
use crate::analysis::summary::FeatureSummary;
use crate::config::AnalysisConfig;

pub use scale::{scale_mask, scale_mask_for_key, ScaleMask};
pub use stages::{generate_stages, StageParams, StageRole, StageTarget};
pub use style::{classify_style, score_styles, ChainStyle, StyleClassification, StyleScores};

/// Complete chain recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Style the stages were generated for
    pub style: ChainStyle,
    /// True when the caller forced the style
    pub style_overridden: bool,
    /// Classifier scores (computed even when overridden)
    pub style_scores: StyleScores,
    /// Why this style was used
    pub style_rationale: String,
    /// Stage targets in chain order
    pub stages: Vec<StageTarget>,
    /// Headline metrics
    pub feature_summary: FeatureSummary,
}

impl Recommendation {
    /// Stage target for `role`
    pub fn stage(&self, role: StageRole) -> Option<&StageTarget> {
        self.stages.iter().find(|s| s.role == role)
    }
}

/// Build a recommendation from a feature set
///
/// `style_override` bypasses the classifier's choice; scores are still reported.
pub fn recommend(
    features: &FeatureSet,
    style_override: Option<ChainStyle>,
    config: &AnalysisConfig,
) -> Recommendation {
    let classification = score_styles(features, config);
    let classified = classification.style();

    let (style, style_rationale) = match style_override {
        Some(style) => (
            style,
            format!(
                "{} requested by caller (classifier chose {}). {}",
                style,
                classified,
                style.description()
            ),
        ),
        None => (classified, classification.rationale()),
    };

    log::debug!("Recommending {} chain: {}", style, style_rationale);

    Recommendation {
        style,
        style_overridden: style_override.is_some(),
        style_scores: classification.scores,
        style_rationale,
        stages: generate_stages(features, style, config),
        feature_summary: FeatureSummary::from(features),
    }
}
