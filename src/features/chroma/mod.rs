//! Chroma extraction
//!
//! Folds FFT energy into a 12-bin pitch-class distribution (0 = C).

pub mod extractor;

pub use extractor::{average_chroma, extract_chroma, pitch_class_of};
