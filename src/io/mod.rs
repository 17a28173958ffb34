//! Audio input types
//!
//! Decoding and resampling happen outside this crate; the engine receives an
//! already-decoded mono buffer.

pub mod audio_buffer;

pub use audio_buffer::AudioBuffer;
