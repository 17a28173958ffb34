//! Scale masks for pitch correction

use serde::{Deserialize, Serialize};

use crate::analysis::result::{parse_pitch_class, KeyEstimate, Mode, NOTE_NAMES};

/// Major scale offsets from the tonic
pub const MAJOR_SCALE: [u32; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Natural minor scale offsets from the tonic
pub const MINOR_SCALE: [u32; 7] = [0, 2, 3, 5, 7, 8, 10];

/// Enabled pitch classes, index 0 = C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleMask(pub [bool; 12]);

impl ScaleMask {
    /// Every note enabled
    pub const CHROMATIC: ScaleMask = ScaleMask([true; 12]);

    /// Diatonic mask for a tonic pitch class and mode
    pub fn diatonic(tonic: u32, mode: Mode) -> Self {
        let offsets = match mode {
            Mode::Major => &MAJOR_SCALE,
            Mode::Minor => &MINOR_SCALE,
        };
        let mut notes = [false; 12];
        for &offset in offsets {
            notes[((tonic + offset) % 12) as usize] = true;
        }
        ScaleMask(notes)
    }

    /// Number of enabled notes
    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&on| on).count()
    }

    /// True when all twelve notes are enabled
    pub fn is_chromatic(&self) -> bool {
        self.0.iter().all(|&on| on)
    }

    /// Enabled pitch classes in ascending order
    pub fn pitch_classes(&self) -> Vec<u32> {
        (0..12).filter(|&pc| self.0[pc as usize]).collect()
    }

    /// Enabled note names in ascending order
    pub fn note_names(&self) -> Vec<&'static str> {
        self.pitch_classes()
            .into_iter()
            .map(|pc| NOTE_NAMES[pc as usize])
            .collect()
    }
}

/// Build a scale mask from a tonic name, mode and confidence
///
/// Confidence below `threshold` or an unrecognised tonic yields the chromatic mask.
///
/// # Example
///
/// ```
/// use vocalchain_dsp::analysis::result::Mode;
/// use vocalchain_dsp::recommend::scale::scale_mask;
///
/// let mask = scale_mask("C", Mode::Major, 0.8, 0.5);
/// assert_eq!(mask.pitch_classes(), vec![0, 2, 4, 5, 7, 9, 11]);
///
/// assert!(scale_mask("C", Mode::Major, 0.2, 0.5).is_chromatic());
/// ```
pub fn scale_mask(tonic: &str, mode: Mode, confidence: f32, threshold: f32) -> ScaleMask {
    if confidence.is_nan() || confidence < threshold {
        return ScaleMask::CHROMATIC;
    }
    match parse_pitch_class(tonic) {
        Some(pc) => ScaleMask::diatonic(pc, mode),
        None => {
            log::warn!("Unrecognised tonic {:?}, using chromatic scale", tonic);
            ScaleMask::CHROMATIC
        }
    }
}

/// Scale mask for a detected key
pub fn scale_mask_for_key(key: &KeyEstimate, threshold: f32) -> ScaleMask {
    scale_mask(key.key.tonic_name(), key.key.mode(), key.confidence, threshold)
}
