//! Borrowed mono sample buffer

/// Mono audio handed to the engine by the caller
///
/// The buffer borrows the caller's samples; the engine never keeps a reference past the
/// analysis call that received it.
#[derive(Debug, Clone, Copy)]
pub struct AudioBuffer<'a> {
    samples: &'a [f32],
    sample_rate: u32,
}

impl<'a> AudioBuffer<'a> {
    /// Wrap mono samples recorded at `sample_rate` Hz
    pub fn new(samples: &'a [f32], sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Raw samples
    pub fn samples(&self) -> &'a [f32] {
        self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds (0.0 for a zero sample rate)
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        let samples = vec![0.0f32; 96_000];
        let buffer = AudioBuffer::new(&samples, 48_000);
        assert_eq!(buffer.len(), 96_000);
        assert!((buffer.duration_seconds() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_rate_duration() {
        let samples = vec![0.0f32; 10];
        assert_eq!(AudioBuffer::new(&samples, 0).duration_seconds(), 0.0);
    }
}
