//! Synthetic signals shared by unit tests

use std::f32::consts::PI;

/// Pure sine
pub fn sine(freq: f32, sample_rate: u32, duration_s: f32, amplitude: f32) -> Vec<f32> {
    let len = (duration_s * sample_rate as f32) as usize;
    (0..len)
        .map(|i| amplitude * (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
        .collect()
}

/// Sum of sines (freq, amplitude)
pub fn chord(partials: &[(f32, f32)], sample_rate: u32, duration_s: f32) -> Vec<f32> {
    let len = (duration_s * sample_rate as f32) as usize;
    (0..len)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            partials
                .iter()
                .map(|&(f, a)| a * (2.0 * PI * f * t).sin())
                .sum()
        })
        .collect()
}

/// Deterministic white noise in [-amplitude, amplitude] (LCG)
pub fn noise(len: usize, amplitude: f32, seed: u32) -> Vec<f32> {
    let mut state = seed.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let unit = (state >> 8) as f32 / (1u32 << 24) as f32;
            amplitude * (2.0 * unit - 1.0)
        })
        .collect()
}

/// Kick drum every beat: 60 Hz tone under an exponentially decaying envelope
pub fn kick_pattern(duration_s: f32, bpm: f32, sample_rate: u32, kick_ms: f32) -> Vec<f32> {
    let sr = sample_rate as f32;
    let num_samples = (duration_s * sr) as usize;
    let mut samples = vec![0.0f32; num_samples];

    let beat_interval = (60.0 / bpm * sr) as usize;
    let kick_samples = (kick_ms / 1000.0 * sr) as usize;

    let mut pos = 0;
    while pos < num_samples {
        let end = (pos + kick_samples).min(num_samples);
        for i in 0..(end - pos) {
            let t = i as f32 / kick_samples as f32;
            let tone = (2.0 * PI * 60.0 * i as f32 / sr).sin();
            samples[pos + i] = 0.8 * (-t * 5.0).exp() * tone;
        }
        pos += beat_interval;
    }

    samples
}

/// Harmonic "voice": 220 Hz fundamental with decaying harmonics up to 3 kHz
pub fn voice_like(sample_rate: u32, duration_s: f32, amplitude: f32) -> Vec<f32> {
    let partials: Vec<(f32, f32)> = (1..=13)
        .map(|h| (220.0 * h as f32, amplitude / h as f32))
        .collect();
    chord(&partials, sample_rate, duration_s)
}
