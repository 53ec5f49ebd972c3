//! Spectral classification core: buffer, transform, bands and decision.
//!
//! Everything in here is target independent and allocation free once
//! constructed.

pub mod bands;
pub mod buffer;
pub mod classifier;
pub mod spectrum;

pub use bands::{BandAnalyzer, BandReduction, FrequencyBand};
pub use buffer::SampleBuffer;
pub use classifier::classify;
pub use spectrum::SpectralTransform;
