//! Analysis result types
//!
//! - Feature set and metric groups
//! - Flat summary for reports

pub mod result;
pub mod summary;

pub use result::{
    parse_pitch_class, BandEnergies, DynamicsMetrics, FeatureSet, Key, KeyEstimate,
    LoudnessMetrics, Mode, SpectralMetrics, VocalMetrics, NOTE_NAMES,
};
pub use summary::FeatureSummary;
