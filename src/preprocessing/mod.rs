//! Input preparation
//!
//! Validates the caller's buffer against the input contract and produces the sample
//! slice every analyzer works on:
//! - Rejects empty, rate-less, rate-mismatched and entirely non-finite buffers
//! - Replaces stray non-finite samples with silence
//! - Truncates to the configured maximum duration

pub mod sanitize;

pub use sanitize::prepare_samples;
