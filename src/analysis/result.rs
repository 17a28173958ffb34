//! Feature set types

use serde::{Deserialize, Serialize};

/// Pitch class names, index 0 = C
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Scale mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Major (Ionian)
    Major,
    /// Natural minor (Aeolian)
    Minor,
}

/// Musical key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Major key (0 = C, 1 = C#, ..., 11 = B)
    Major(u32),
    /// Minor key (0 = C, 1 = C#, ..., 11 = B)
    Minor(u32),
}

impl Key {
    /// Build a key from a tonic pitch class and mode
    pub fn from_parts(tonic: u32, mode: Mode) -> Self {
        match mode {
            Mode::Major => Key::Major(tonic % 12),
            Mode::Minor => Key::Minor(tonic % 12),
        }
    }

    /// Tonic pitch class (0 = C)
    pub fn tonic(&self) -> u32 {
        match self {
            Key::Major(i) | Key::Minor(i) => *i % 12,
        }
    }

    /// Scale mode
    pub fn mode(&self) -> Mode {
        match self {
            Key::Major(_) => Mode::Major,
            Key::Minor(_) => Mode::Minor,
        }
    }

    /// Tonic note name ("C", "F#", ...)
    pub fn tonic_name(&self) -> &'static str {
        NOTE_NAMES[self.tonic() as usize]
    }

    /// Get key name in musical notation (e.g., "C", "Am", "F#", "D#m")
    ///
    /// # Example
    ///
    /// ```
    /// use vocalchain_dsp::analysis::result::Key;
    ///
    /// assert_eq!(Key::Major(0).name(), "C");
    /// assert_eq!(Key::Major(6).name(), "F#");
    /// assert_eq!(Key::Minor(9).name(), "Am");
    /// ```
    pub fn name(&self) -> String {
        match self {
            Key::Major(_) => self.tonic_name().to_string(),
            Key::Minor(_) => format!("{}m", self.tonic_name()),
        }
    }
}

/// Parse a note name into a pitch class (0 = C)
///
/// Accepts naturals, sharps (`#`) and flats (`b`), case-insensitive on the letter:
/// `"C"`, `"c#"`, `"Db"`.
pub fn parse_pitch_class(name: &str) -> Option<u32> {
    let mut chars = name.trim().chars();
    let base: i32 = match chars.next()?.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    let accidental = match chars.as_str() {
        "" => 0,
        "#" => 1,
        "b" => -1,
        _ => return None,
    };
    Some((base + accidental).rem_euclid(12) as u32)
}

/// Detected key with confidence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyEstimate {
    /// Best-matching key
    pub key: Key,
    /// Pearson correlation of the winning template, clamped to [0, 1]
    pub confidence: f32,
}

impl Default for KeyEstimate {
    fn default() -> Self {
        Self {
            key: Key::Major(0),
            confidence: 0.0,
        }
    }
}

/// Loudness measurements (ITU-R BS.1770-4)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoudnessMetrics {
    /// Integrated loudness over the whole clip in LUFS
    pub integrated_lufs: f32,
    /// 90th percentile of 3-second window loudness in LUFS
    pub short_term_lufs: f32,
}

/// Level and crest factor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DynamicsMetrics {
    /// RMS level in dBFS
    pub rms_db: f32,
    /// Sample peak in dBFS
    pub peak_dbfs: f32,
    /// `peak_dbfs - rms_db`
    pub crest_db: f32,
}

/// Named band energy ratios, each in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BandEnergies {
    /// 20-80 Hz
    pub rumble: f32,
    /// 200-500 Hz
    pub mud: f32,
    /// 500-1000 Hz
    pub boxy: f32,
    /// 2-5 kHz
    pub harsh: f32,
    /// 5-10 kHz
    pub sibilance: f32,
}

impl BandEnergies {
    /// (name, ratio) pairs in a fixed order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f32)> {
        [
            ("rumble", self.rumble),
            ("mud", self.mud),
            ("boxy", self.boxy),
            ("harsh", self.harsh),
            ("sibilance", self.sibilance),
        ]
        .into_iter()
    }
}

/// Spectral balance
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpectralMetrics {
    /// Band energy ratios
    pub bands: BandEnergies,
    /// Slope of log10 magnitude against log10 frequency (negative = darker)
    pub spectral_tilt: f32,
}

/// Vocal descriptors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VocalMetrics {
    /// Whether the 300-3000 Hz ratio exceeds the presence threshold
    pub present: bool,
    /// 5-10 kHz energy ratio
    pub sibilance_idx: f32,
    /// 50-200 Hz energy ratio
    pub plosive_idx: f32,
    /// `1 - clamp(std/mean)` of the f0 track; 0.5 with too few observations, 0.0 without vocal
    pub note_stability: f32,
}

/// Complete feature set for one clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Tempo in BPM (always positive)
    pub tempo_bpm: f32,
    /// Key estimate
    pub key: KeyEstimate,
    /// Loudness
    pub loudness: LoudnessMetrics,
    /// Dynamics
    pub dynamics: DynamicsMetrics,
    /// Spectral balance
    pub spectral: SpectralMetrics,
    /// Reverb tail estimate in seconds
    pub reverb_tail_s: f32,
    /// Vocal descriptors
    pub vocal: VocalMetrics,
    /// Analysed duration in seconds
    pub duration_seconds: f32,
}

impl FeatureSet {
    /// True when every numeric field is finite
    pub fn is_finite(&self) -> bool {
        let scalars = [
            self.tempo_bpm,
            self.key.confidence,
            self.loudness.integrated_lufs,
            self.loudness.short_term_lufs,
            self.dynamics.rms_db,
            self.dynamics.peak_dbfs,
            self.dynamics.crest_db,
            self.spectral.spectral_tilt,
            self.reverb_tail_s,
            self.vocal.sibilance_idx,
            self.vocal.plosive_idx,
            self.vocal.note_stability,
            self.duration_seconds,
        ];
        scalars.iter().all(|v| v.is_finite()) && self.spectral.bands.iter().all(|(_, v)| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_name_major() {
        assert_eq!(Key::Major(0).name(), "C");
        assert_eq!(Key::Major(1).name(), "C#");
        assert_eq!(Key::Major(6).name(), "F#");
        assert_eq!(Key::Major(11).name(), "B");
    }

    #[test]
    fn test_key_name_minor() {
        assert_eq!(Key::Minor(0).name(), "Cm");
        assert_eq!(Key::Minor(9).name(), "Am");
        assert_eq!(Key::Minor(11).name(), "Bm");
    }

    #[test]
    fn test_key_parts() {
        let key = Key::from_parts(14, Mode::Minor);
        assert_eq!(key, Key::Minor(2));
        assert_eq!(key.tonic(), 2);
        assert_eq!(key.mode(), Mode::Minor);
        assert_eq!(key.tonic_name(), "D");
    }

    #[test]
    fn test_parse_pitch_class() {
        assert_eq!(parse_pitch_class("C"), Some(0));
        assert_eq!(parse_pitch_class("c#"), Some(1));
        assert_eq!(parse_pitch_class("Db"), Some(1));
        assert_eq!(parse_pitch_class("Bb"), Some(10));
        assert_eq!(parse_pitch_class("Cb"), Some(11));
        assert_eq!(parse_pitch_class("H"), None);
        assert_eq!(parse_pitch_class(""), None);
        assert_eq!(parse_pitch_class("C##"), None);
    }

    #[test]
    fn test_band_iteration_order() {
        let bands = BandEnergies {
            rumble: 0.1,
            mud: 0.2,
            boxy: 0.3,
            harsh: 0.4,
            sibilance: 0.5,
        };
        let names: Vec<&str> = bands.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["rumble", "mud", "boxy", "harsh", "sibilance"]);
    }
}
