//! Krumhansl-Schmuckler key templates
//!
//! Tonal profiles for 24 keys (12 major + 12 minor), obtained by rotating the
//! C major and C minor probe-tone ratings.
//!
//! # Reference
//!
//! Krumhansl, C. L., & Kessler, E. J. (1982). Tracing the Dynamic Changes in Perceived
//! Tonal Organization in a Spatial Representation of Musical Keys. *Psychological Review*,
//! 89(4), 334-368.

/// C major probe-tone profile
pub const MAJOR_PROFILE: [f32; 12] = [
    6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88,
];

/// C minor probe-tone profile
pub const MINOR_PROFILE: [f32; 12] = [
    6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17,
];

/// Key templates for all 24 keys
#[derive(Debug, Clone)]
pub struct KeyTemplates {
    /// Major key templates (index = tonic: C, C#, D, ..., B)
    pub major: [[f32; 12]; 12],

    /// Minor key templates (index = tonic: C, C#, D, ..., B)
    pub minor: [[f32; 12]; 12],
}

impl KeyTemplates {
    /// Create templates from the Krumhansl-Schmuckler profiles
    pub fn new() -> Self {
        let mut major = [[0.0f32; 12]; 12];
        let mut minor = [[0.0f32; 12]; 12];
        for tonic in 0..12 {
            major[tonic] = rotate(&MAJOR_PROFILE, tonic);
            minor[tonic] = rotate(&MINOR_PROFILE, tonic);
        }
        Self { major, minor }
    }

    /// Template for the major key on `tonic` (0 = C)
    pub fn get_major_template(&self, tonic: u32) -> &[f32; 12] {
        &self.major[tonic as usize % 12]
    }

    /// Template for the minor key on `tonic` (0 = C)
    pub fn get_minor_template(&self, tonic: u32) -> &[f32; 12] {
        &self.minor[tonic as usize % 12]
    }
}

impl Default for KeyTemplates {
    fn default() -> Self {
        Self::new()
    }
}

/// Shift a C-based profile so that its tonic weight lands on pitch class `tonic`
fn rotate(profile: &[f32; 12], tonic: usize) -> [f32; 12] {
    let mut rotated = [0.0f32; 12];
    for (pc, slot) in rotated.iter_mut().enumerate() {
        *slot = profile[(pc + 12 - tonic) % 12];
    }
    rotated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_templates_match_profiles() {
        let templates = KeyTemplates::new();
        assert_eq!(templates.get_major_template(0), &MAJOR_PROFILE);
        assert_eq!(templates.get_minor_template(0), &MINOR_PROFILE);
    }

    #[test]
    fn test_rotation_places_tonic() {
        let templates = KeyTemplates::new();
        // A minor: tonic weight on A (9), minor third on C (0)
        let a_minor = templates.get_minor_template(9);
        assert_eq!(a_minor[9], MINOR_PROFILE[0]);
        assert_eq!(a_minor[0], MINOR_PROFILE[3]);
        // G major: tonic on G (7), fifth on D (2)
        let g_major = templates.get_major_template(7);
        assert_eq!(g_major[7], MAJOR_PROFILE[0]);
        assert_eq!(g_major[2], MAJOR_PROFILE[7]);
    }
}
