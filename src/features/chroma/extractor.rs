//! Chroma vector extraction
//!
//! Converts an FFT magnitude spectrogram to 12-element chroma vectors. Each bin between
//! [`CHROMA_MIN_HZ`] and [`CHROMA_MAX_HZ`] contributes its power to the pitch class of the
//! nearest equal-tempered semitone (A4 = 440 Hz).

use crate::error::AnalysisError;
use crate::features::spectral::Spectrogram;

/// Lowest frequency folded into chroma (C2)
pub const CHROMA_MIN_HZ: f32 = 65.0;

/// Highest frequency folded into chroma
pub const CHROMA_MAX_HZ: f32 = 5000.0;

const A4_FREQ: f32 = 440.0;

/// Pitch class (0 = C) of the semitone nearest to `freq_hz`
pub fn pitch_class_of(freq_hz: f32) -> Option<usize> {
    if freq_hz.is_nan() || freq_hz <= 0.0 {
        return None;
    }
    let midi = 69.0 + 12.0 * (freq_hz / A4_FREQ).log2();
    Some((midi.round() as i64).rem_euclid(12) as usize)
}

/// Extract chroma vectors from audio samples
///
/// # Arguments
///
/// * `samples` - Audio samples
/// * `sample_rate` - Sample rate in Hz
/// * `frame_size` - FFT frame size (default: 8192)
/// * `hop_size` - Hop size (default: 4096)
///
/// # Returns
///
/// One 12-element chroma vector per frame
///
/// # Errors
///
/// Returns `AnalysisError::ExtractionFailure` if the spectrogram cannot be computed
pub fn extract_chroma(
    samples: &[f32],
    sample_rate: u32,
    frame_size: usize,
    hop_size: usize,
) -> Result<Vec<[f32; 12]>, AnalysisError> {
    log::debug!(
        "Extracting chroma: {} samples at {} Hz, frame={}, hop={}",
        samples.len(),
        sample_rate,
        frame_size,
        hop_size
    );

    let spectrogram = Spectrogram::compute(samples, sample_rate, frame_size, hop_size)?;
    let bins = spectrogram.bin_range(CHROMA_MIN_HZ, CHROMA_MAX_HZ);
    let bin_classes: Vec<Option<usize>> = bins
        .clone()
        .map(|b| pitch_class_of(spectrogram.bin_frequency(b)))
        .collect();

    Ok(spectrogram
        .frames()
        .map(|frame| {
            let mut chroma = [0.0f32; 12];
            for (class, &mag) in bin_classes.iter().zip(&frame[bins.clone()]) {
                if let Some(pc) = class {
                    chroma[*pc] += mag * mag;
                }
            }
            chroma
        })
        .collect())
}

/// Average chroma vectors across frames
///
/// Returns `None` for an empty frame list.
pub fn average_chroma(chroma_vectors: &[[f32; 12]]) -> Option<[f32; 12]> {
    if chroma_vectors.is_empty() {
        return None;
    }
    let mut acc = [0.0f64; 12];
    for chroma in chroma_vectors {
        for (a, &c) in acc.iter_mut().zip(chroma) {
            *a += c as f64;
        }
    }
    let n = chroma_vectors.len() as f64;
    let mut mean = [0.0f32; 12];
    for (m, a) in mean.iter_mut().zip(acc) {
        *m = (a / n) as f32;
    }
    Some(mean)
}
