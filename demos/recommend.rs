//! Analyze a synthetic vocal and print the chain recommendation as JSON
//!
//! ```text
//! RUST_LOG=debug cargo run --example recommend -- [style]
//! ```

use std::f32::consts::PI;

use vocalchain_dsp::{AnalysisConfig, AudioBuffer, ChainStyle, VocalChainEngine};

const SAMPLE_RATE: u32 = 48_000;

/// Slightly wavering 196 Hz voice with breathy noise and a 92 BPM kick
fn synthesize(seconds: f32) -> Vec<f32> {
    let len = (seconds * SAMPLE_RATE as f32) as usize;
    let beat = (60.0 / 92.0 * SAMPLE_RATE as f32) as usize;
    let mut noise_state: u32 = 0x1234_5678;
    let mut phase = 0.0f32;

    (0..len)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let f0 = 196.0 * (1.0 + 0.01 * (2.0 * PI * 5.0 * t).sin());
            phase += 2.0 * PI * f0 / SAMPLE_RATE as f32;

            let voice: f32 = (1..=12).map(|h| 0.15 / h as f32 * (phase * h as f32).sin()).sum();

            noise_state = noise_state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let breath = 0.01 * ((noise_state >> 8) as f32 / (1u32 << 24) as f32 - 0.5);

            let since_kick = (i % beat) as f32 / SAMPLE_RATE as f32;
            let kick = 0.3 * (-since_kick / 0.04).exp() * (2.0 * PI * 55.0 * since_kick).sin();

            voice + breath + kick
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let style_override = std::env::args()
        .nth(1)
        .map(|s| s.parse::<ChainStyle>())
        .transpose()?;

    let engine = VocalChainEngine::new(AnalysisConfig::default())?;
    let samples = synthesize(12.0);
    let recommendation = engine.analyze(&AudioBuffer::new(&samples, SAMPLE_RATE), style_override)?;

    println!("{}", serde_json::to_string_pretty(&recommendation)?);
    Ok(())
}
