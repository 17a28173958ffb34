//! Stage target generators
//!
//! One pure generator per chain role. Each maps `(features, style, config)` to a
//! [`StageTarget`] carrying an enabled flag, typed parameters and a rationale that names
//! the metrics it was derived from.

pub mod compressor;
pub mod enhancer;
pub mod eq;
pub mod leveler;
pub mod pitch;
pub mod spatial;

use std::fmt;

use serde::{Deserialize, Serialize};

use super::scale::ScaleMask;
use super::style::ChainStyle;
use crate::analysis::result::FeatureSet;
use crate::config::AnalysisConfig;

/// Position in the processing chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageRole {
    /// Pitch correction
    PitchCorrection,
    /// Static corrective EQ
    SubtractiveEq,
    /// Frequency-dependent compression (de-essing, mud and harshness control)
    DynamicEq,
    /// Main vocal compressor
    PrimaryCompressor,
    /// Slow gain riding
    Leveler,
    /// Presence and air enhancement
    Enhancer,
    /// Bus-style glue compression
    GlueCompressor,
    /// Reverb send
    Spatial,
}

impl StageRole {
    /// All roles in chain order
    pub const ALL: [StageRole; 8] = [
        StageRole::PitchCorrection,
        StageRole::SubtractiveEq,
        StageRole::DynamicEq,
        StageRole::PrimaryCompressor,
        StageRole::Leveler,
        StageRole::Enhancer,
        StageRole::GlueCompressor,
        StageRole::Spatial,
    ];

    /// Wire name ("primary-compressor", ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            StageRole::PitchCorrection => "pitch-correction",
            StageRole::SubtractiveEq => "subtractive-eq",
            StageRole::DynamicEq => "dynamic-eq",
            StageRole::PrimaryCompressor => "primary-compressor",
            StageRole::Leveler => "leveler",
            StageRole::Enhancer => "enhancer",
            StageRole::GlueCompressor => "glue-compressor",
            StageRole::Spatial => "spatial",
        }
    }
}

impl fmt::Display for StageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Problem a corrective move addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EqTarget {
    /// Sub-bass rumble
    Rumble,
    /// Low-mid build-up
    Mud,
    /// Boxy mid resonance
    Boxiness,
    /// Upper-mid harshness
    Harshness,
    /// Sibilant consonants
    Sibilance,
    /// Presence lift
    Presence,
}

/// Filter shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterShape {
    /// High-pass (gain unused)
    HighPass,
    /// Peaking bell
    Bell,
    /// Narrow notch
    Notch,
}

/// One static EQ move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqMove {
    /// What the move addresses
    pub target: EqTarget,
    /// Filter shape
    pub shape: FilterShape,
    /// Centre or corner frequency in Hz
    pub freq_hz: f32,
    /// Gain in dB (0 for high-pass)
    pub gain_db: f32,
    /// Quality factor
    pub q: f32,
}

/// One dynamic EQ band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicBand {
    /// What the band controls
    pub target: EqTarget,
    /// Centre frequency in Hz
    pub freq_hz: f32,
    /// Quality factor
    pub q: f32,
    /// Threshold in dBFS
    pub threshold_db: f32,
    /// Compression ratio
    pub ratio: f32,
}

/// Compressor settings (primary and glue)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressorParams {
    /// Compression ratio
    pub ratio: f32,
    /// Attack in milliseconds
    pub attack_ms: f32,
    /// Release in milliseconds
    pub release_ms: f32,
    /// Intended gain reduction in dB
    pub target_gr_db: f32,
    /// Make-up gain in dB
    pub output_gain_db: f32,
}

/// Leveler response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LevelerMode {
    /// Slow, transparent riding
    Gentle,
    /// Moderate riding
    Medium,
    /// Fast, assertive riding
    Fast,
}

/// Reverb impulse-response family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IrCategory {
    /// Small natural room
    SmallRoom,
    /// Very short, dry room
    ShortRoom,
    /// Plate
    Plate,
    /// Echo chamber
    Chamber,
    /// Large hall
    Hall,
}

/// Role-specific stage parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StageParams {
    /// Pitch correction strength and scale
    PitchCorrection {
        /// Correction amount (0.0-1.0)
        amount: f32,
        /// Retune speed (0.0-1.0, higher = faster)
        speed: f32,
        /// Detected key name
        key: String,
        /// Notes the corrector may snap to
        scale: ScaleMask,
    },
    /// Ordered static EQ moves
    SubtractiveEq {
        /// Moves in presentation order
        moves: Vec<EqMove>,
    },
    /// Ordered dynamic EQ bands
    DynamicEq {
        /// Bands in presentation order
        bands: Vec<DynamicBand>,
    },
    /// Compressor settings
    Compressor(CompressorParams),
    /// Leveler settings
    Leveler {
        /// Intended gain reduction in dB
        target_gr_db: f32,
        /// Response mode
        mode: LevelerMode,
    },
    /// Enhancer settings
    Enhancer {
        /// Presence lift in dB
        presence_db: f32,
        /// Brilliance (air) lift in dB
        brilliance_db: f32,
    },
    /// Reverb send settings
    Spatial {
        /// Impulse-response family
        ir: IrCategory,
        /// Wet level (0.0-1.0)
        wet: f32,
        /// Pre-delay in milliseconds
        pre_delay_ms: f32,
    },
}

/// Target settings for one chain stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTarget {
    /// Chain role
    pub role: StageRole,
    /// Whether the stage should be active
    pub enabled: bool,
    /// Parameters (meaningful even when disabled)
    pub params: StageParams,
    /// Why these settings were chosen
    pub rationale: String,
}

/// Normalized excess of `value` over `threshold`, in [0, 1]
pub(crate) fn excess(value: f32, threshold: f32) -> f32 {
    let headroom = (1.0 - threshold).max(f32::EPSILON);
    ((value - threshold) / headroom).clamp(0.0, 1.0)
}

/// Run all eight generators in chain order
pub fn generate_stages(
    features: &FeatureSet,
    style: ChainStyle,
    config: &AnalysisConfig,
) -> Vec<StageTarget> {
    let stages = vec![
        pitch::pitch_correction(features, style, config),
        eq::subtractive_eq(features, style, config),
        eq::dynamic_eq(features, style, config),
        compressor::primary_compressor(features, style, config),
        leveler::leveler(features, style, config),
        enhancer::enhancer(features, style, config),
        compressor::glue_compressor(features, style, config),
        spatial::spatial(features, style, config),
    ];
    for stage in &stages {
        log::debug!(
            "Stage {}: enabled={} ({})",
            stage.role,
            stage.enabled,
            stage.rationale
        );
    }
    stages
}
