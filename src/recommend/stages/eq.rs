//! Subtractive and dynamic EQ
//!
//! Corrective moves scale with how far a band ratio exceeds its threshold, normalized to
//! the remaining headroom (`(value - threshold) / (1 - threshold)`).

use super::{excess, DynamicBand, EqMove, EqTarget, FilterShape, StageParams, StageRole, StageTarget};
use crate::analysis::result::FeatureSet;
use crate::config::AnalysisConfig;
use crate::recommend::style::ChainStyle;

/// Extra mud above `mud_threshold` that pushes the high-pass to its top tier
const SEVERE_MUD_MARGIN: f32 = 0.15;

const SIBILANCE_NOTCH_HZ: f32 = 7000.0;

/// High-pass corner: 60, 80 or 100 Hz
fn high_pass_hz(features: &FeatureSet, config: &AnalysisConfig) -> f32 {
    let bands = &features.spectral.bands;
    if bands.rumble > config.rumble_severe_threshold
        || bands.mud > config.mud_threshold + SEVERE_MUD_MARGIN
    {
        100.0
    } else if bands.rumble > config.rumble_threshold || bands.mud > config.mud_threshold {
        80.0
    } else {
        60.0
    }
}

/// Presence boost (Hz, dB) for bright styles
fn presence_boost(style: ChainStyle) -> Option<(f32, f32)> {
    match style {
        ChainStyle::PopAiry => Some((4000.0, 1.5)),
        ChainStyle::AggressiveRap => Some((3500.0, 1.0)),
        _ => None,
    }
}

/// Static corrective EQ: high-pass, mud/boxy/harsh cuts, sibilance notch, presence boost
pub fn subtractive_eq(
    features: &FeatureSet,
    style: ChainStyle,
    config: &AnalysisConfig,
) -> StageTarget {
    let bands = &features.spectral.bands;
    let hp = high_pass_hz(features, config);
    let mut moves = vec![EqMove {
        target: EqTarget::Rumble,
        shape: FilterShape::HighPass,
        freq_hz: hp,
        gain_db: 0.0,
        q: std::f32::consts::FRAC_1_SQRT_2,
    }];
    let mut reasons = vec![format!(
        "high-pass {:.0} Hz (rumble {:.2}, mud {:.2})",
        hp, bands.rumble, bands.mud
    )];

    if bands.mud > config.mud_threshold {
        let n = excess(bands.mud, config.mud_threshold);
        moves.push(EqMove {
            target: EqTarget::Mud,
            shape: FilterShape::Bell,
            freq_hz: 250.0 + 150.0 * n,
            gain_db: -2.0 - 4.0 * n,
            q: 1.2,
        });
        reasons.push(format!("mud {:.2} > {:.2}", bands.mud, config.mud_threshold));
    }

    if bands.boxy > config.boxy_threshold {
        let n = excess(bands.boxy, config.boxy_threshold);
        moves.push(EqMove {
            target: EqTarget::Boxiness,
            shape: FilterShape::Bell,
            freq_hz: 500.0 + 300.0 * n,
            gain_db: -1.5 - 3.0 * n,
            q: 1.4,
        });
        reasons.push(format!("boxiness {:.2} > {:.2}", bands.boxy, config.boxy_threshold));
    }

    if bands.harsh > config.harsh_threshold {
        let n = excess(bands.harsh, config.harsh_threshold);
        moves.push(EqMove {
            target: EqTarget::Harshness,
            shape: FilterShape::Bell,
            freq_hz: 2500.0 + 1500.0 * n,
            gain_db: -1.5 - 3.5 * n,
            q: 2.0,
        });
        reasons.push(format!("harshness {:.2} > {:.2}", bands.harsh, config.harsh_threshold));
    }

    if bands.sibilance > config.sibilance_notch_threshold {
        moves.push(EqMove {
            target: EqTarget::Sibilance,
            shape: FilterShape::Notch,
            freq_hz: SIBILANCE_NOTCH_HZ,
            gain_db: -3.0,
            q: 4.0,
        });
        reasons.push(format!(
            "sibilance {:.2} > {:.2}",
            bands.sibilance, config.sibilance_notch_threshold
        ));
    }

    if let Some((freq_hz, gain_db)) = presence_boost(style) {
        if bands.harsh <= config.presence_boost_max_harsh {
            moves.push(EqMove {
                target: EqTarget::Presence,
                shape: FilterShape::Bell,
                freq_hz,
                gain_db,
                q: 1.0,
            });
            reasons.push(format!(
                "{} presence lift, harshness {:.2} <= {:.2}",
                style, bands.harsh, config.presence_boost_max_harsh
            ));
        }
    }

    StageTarget {
        role: StageRole::SubtractiveEq,
        enabled: true,
        params: StageParams::SubtractiveEq { moves },
        rationale: reasons.join("; "),
    }
}

/// Dynamic EQ: de-esser, mud control and (bright styles only) harshness control
pub fn dynamic_eq(features: &FeatureSet, style: ChainStyle, config: &AnalysisConfig) -> StageTarget {
    let bands = &features.spectral.bands;
    let loud = features.loudness.integrated_lufs > config.loudness_threshold_lufs;
    let mut dynamic_bands = Vec::new();
    let mut reasons = Vec::new();

    if bands.sibilance > config.sibilance_threshold {
        let n = excess(bands.sibilance, config.sibilance_threshold);
        let threshold_db = -20.0 - 10.0 * n + if loud { 3.0 } else { 0.0 };
        dynamic_bands.push(DynamicBand {
            target: EqTarget::Sibilance,
            freq_hz: 6500.0 + 1500.0 * n,
            q: 2.0,
            threshold_db,
            ratio: 2.0 + 2.0 * n,
        });
        reasons.push(format!(
            "de-ess: sibilance {:.2} > {:.2}{}",
            bands.sibilance,
            config.sibilance_threshold,
            if loud { ", loud source" } else { "" }
        ));
    }

    if bands.mud > config.mud_threshold {
        dynamic_bands.push(DynamicBand {
            target: EqTarget::Mud,
            freq_hz: 300.0,
            q: 1.0,
            threshold_db: -24.0,
            ratio: 2.0,
        });
        reasons.push(format!("mud control: mud {:.2} > {:.2}", bands.mud, config.mud_threshold));
    }

    if style.is_bright() && bands.harsh > config.harsh_threshold {
        dynamic_bands.push(DynamicBand {
            target: EqTarget::Harshness,
            freq_hz: 3500.0,
            q: 1.5,
            threshold_db: -22.0,
            ratio: 2.0,
        });
        reasons.push(format!(
            "harsh control for {}: harshness {:.2} > {:.2}",
            style, bands.harsh, config.harsh_threshold
        ));
    }

    let enabled = !dynamic_bands.is_empty();
    let rationale = if enabled {
        reasons.join("; ")
    } else {
        format!(
            "sibilance {:.2}, mud {:.2}, harshness {:.2} within limits",
            bands.sibilance, bands.mud, bands.harsh
        )
    };

    StageTarget {
        role: StageRole::DynamicEq,
        enabled,
        params: StageParams::DynamicEq {
            bands: dynamic_bands,
        },
        rationale,
    }
}
