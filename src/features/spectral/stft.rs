//! Short-time Fourier transform and band energy helpers

use std::ops::Range;

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use super::EPSILON;
use crate::error::AnalysisError;

/// Hann window of length `n`
pub fn hann_window(n: usize) -> Vec<f32> {
    if n < 2 {
        return vec![1.0; n];
    }
    (0..n)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / n as f32).cos()))
        .collect()
}

/// Magnitude spectrogram (frames x bins, stored row-major)
///
/// Frames are Hann-windowed. Audio shorter than one frame is zero-padded into a single
/// frame so every non-empty input yields at least one spectrum.
#[derive(Debug, Clone)]
pub struct Spectrogram {
    magnitudes: Vec<f32>,
    num_frames: usize,
    num_bins: usize,
    sample_rate: u32,
    frame_size: usize,
    hop_size: usize,
}

impl Spectrogram {
    /// Compute the magnitude spectrogram of `samples`
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::ExtractionFailure` for empty input or zero frame/hop sizes
    pub fn compute(
        samples: &[f32],
        sample_rate: u32,
        frame_size: usize,
        hop_size: usize,
    ) -> Result<Self, AnalysisError> {
        if samples.is_empty() {
            return Err(AnalysisError::extraction("stft", "empty audio samples"));
        }
        if frame_size == 0 || hop_size == 0 || sample_rate == 0 {
            return Err(AnalysisError::extraction(
                "stft",
                format!(
                    "invalid parameters: frame={}, hop={}, rate={}",
                    frame_size, hop_size, sample_rate
                ),
            ));
        }

        let num_frames = if samples.len() <= frame_size {
            1
        } else {
            (samples.len() - frame_size) / hop_size + 1
        };
        let num_bins = frame_size / 2 + 1;

        log::debug!(
            "Computing STFT: {} samples, frame={}, hop={}, {} frames",
            samples.len(),
            frame_size,
            hop_size,
            num_frames
        );

        let window = hann_window(frame_size);
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(frame_size);
        let mut buffer = vec![Complex::new(0.0f32, 0.0); frame_size];
        let mut magnitudes = Vec::with_capacity(num_frames * num_bins);

        for frame in 0..num_frames {
            let start = frame * hop_size;
            let end = (start + frame_size).min(samples.len());
            let chunk = &samples[start..end];

            for (i, slot) in buffer.iter_mut().enumerate() {
                let x = chunk.get(i).copied().unwrap_or(0.0);
                *slot = Complex::new(x * window[i], 0.0);
            }
            fft.process(&mut buffer);
            magnitudes.extend(buffer[..num_bins].iter().map(|c| c.norm()));
        }

        Ok(Self {
            magnitudes,
            num_frames,
            num_bins,
            sample_rate,
            frame_size,
            hop_size,
        })
    }

    /// Number of frames
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Number of frequency bins per frame (`frame_size / 2 + 1`)
    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    /// Hop size in samples
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Iterate over frames in time order
    pub fn frames(&self) -> impl Iterator<Item = &[f32]> {
        self.magnitudes.chunks_exact(self.num_bins)
    }

    /// Centre frequency of `bin` in Hz
    pub fn bin_frequency(&self, bin: usize) -> f32 {
        bin as f32 * self.sample_rate as f32 / self.frame_size as f32
    }

    /// Bin spacing in Hz
    pub fn resolution_hz(&self) -> f32 {
        self.sample_rate as f32 / self.frame_size as f32
    }

    /// Bins whose centre frequency lies in `[low_hz, high_hz)`
    pub fn bin_range(&self, low_hz: f32, high_hz: f32) -> Range<usize> {
        let resolution = self.resolution_hz();
        let start = (low_hz / resolution).ceil().max(0.0) as usize;
        let end = (high_hz / resolution).ceil().max(0.0) as usize;
        start.min(self.num_bins)..end.min(self.num_bins)
    }

    /// Time-averaged magnitude spectrum
    pub fn mean_magnitude(&self) -> Vec<f32> {
        self.mean_by(|m| m)
    }

    /// Time-averaged power spectrum (squared magnitude)
    pub fn mean_power(&self) -> Vec<f32> {
        self.mean_by(|m| m * m)
    }

    fn mean_by(&self, f: impl Fn(f32) -> f32) -> Vec<f32> {
        let mut acc = vec![0.0f64; self.num_bins];
        for frame in self.frames() {
            for (a, &m) in acc.iter_mut().zip(frame) {
                *a += f(m) as f64;
            }
        }
        let n = self.num_frames.max(1) as f64;
        acc.into_iter().map(|a| (a / n) as f32).collect()
    }
}

/// Energy in `[low_hz, high_hz)` divided by total energy (DC excluded)
///
/// `power` is a power spectrum whose bin `i` sits at `i * resolution_hz`.
/// Returns `None` when the spectrum carries no energy.
pub fn band_energy_ratio(power: &[f32], resolution_hz: f32, low_hz: f32, high_hz: f32) -> Option<f32> {
    if power.len() < 2 || resolution_hz <= 0.0 {
        return None;
    }

    let total: f64 = power[1..].iter().map(|&p| p as f64).sum();
    if total <= EPSILON as f64 {
        return None;
    }

    let band: f64 = power
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(i, _)| {
            let f = *i as f32 * resolution_hz;
            f >= low_hz && f < high_hz
        })
        .map(|(_, &p)| p as f64)
        .sum();

    let ratio = (band / total) as f32;
    ratio.is_finite().then(|| ratio.clamp(0.0, 1.0))
}

/// Sum of squared samples per frame
///
/// Frames that would run past the end of the buffer are dropped; audio shorter than one
/// frame yields a single frame over the whole buffer.
pub fn frame_energies(samples: &[f32], frame_size: usize, hop_size: usize) -> Vec<f32> {
    if samples.is_empty() || frame_size == 0 || hop_size == 0 {
        return Vec::new();
    }

    if samples.len() <= frame_size {
        return vec![samples.iter().map(|&x| x * x).sum()];
    }

    let num_frames = (samples.len() - frame_size) / hop_size + 1;
    (0..num_frames)
        .map(|i| {
            let start = i * hop_size;
            samples[start..start + frame_size]
                .iter()
                .map(|&x| x * x)
                .sum()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32, len: usize, amplitude: f32) -> Vec<f32> {
        (0..len)
            .map(|i| {
                amplitude
                    * (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin()
            })
            .collect()
    }

    #[test]
    fn test_hann_window_endpoints() {
        let w = hann_window(8);
        assert_eq!(w.len(), 8);
        assert!(w[0].abs() < 1e-6);
        assert!((w[4] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_spectrogram_peak_bin() {
        let sr = 48_000;
        let samples = sine(1500.0, sr, 48_000, 0.5);
        let spectrogram = Spectrogram::compute(&samples, sr, 2048, 512).unwrap();

        assert_eq!(spectrogram.num_bins(), 1025);
        assert_eq!(spectrogram.num_frames(), (48_000 - 2048) / 512 + 1);

        let mean = spectrogram.mean_magnitude();
        let (peak_bin, _) = mean
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap();
        assert!((spectrogram.bin_frequency(peak_bin) - 1500.0).abs() < 30.0);
    }

    #[test]
    fn test_short_input_single_frame() {
        let samples = vec![0.1f32; 100];
        let spectrogram = Spectrogram::compute(&samples, 48_000, 2048, 512).unwrap();
        assert_eq!(spectrogram.num_frames(), 1);
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(Spectrogram::compute(&[], 48_000, 2048, 512).is_err());
    }

    #[test]
    fn test_band_energy_ratio_tone() {
        let sr = 48_000;
        let samples = sine(7000.0, sr, 24_000, 0.5);
        let spectrogram = Spectrogram::compute(&samples, sr, 2048, 512).unwrap();
        let power = spectrogram.mean_power();
        let resolution = sr as f32 / 2048.0;

        let sibilance = band_energy_ratio(&power, resolution, 5000.0, 10_000.0).unwrap();
        let mud = band_energy_ratio(&power, resolution, 200.0, 500.0).unwrap();
        assert!(sibilance > 0.95, "sibilance ratio {}", sibilance);
        assert!(mud < 0.01, "mud ratio {}", mud);
    }

    #[test]
    fn test_band_energy_ratio_silence() {
        let power = vec![0.0f32; 1025];
        assert_eq!(band_energy_ratio(&power, 23.4, 200.0, 500.0), None);
    }

    #[test]
    fn test_frame_energies() {
        let samples = vec![0.5f32; 4096];
        let energies = frame_energies(&samples, 2048, 512);
        assert_eq!(energies.len(), (4096 - 2048) / 512 + 1);
        assert!((energies[0] - 512.0).abs() < 1e-3);
    }
}
