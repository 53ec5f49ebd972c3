//! TremorScope — spectral tremor/dyskinesia detection from a wrist-worn
//! accelerometer.
//!
//! A periodic timer drives acquisition of a 256-sample window at 104 Hz.
//! Each window is Hann-windowed, transformed with a real FFT and reduced to
//! the peak magnitude of the tremor (3–5 Hz) and dyskinesia (5–7 Hz) bands.
//! The larger band wins when it clears ten times the low-frequency noise
//! floor.
//!
//! The pipeline is target independent; peripherals sit behind the traits in
//! [`drivers`], with ESP-IDF implementations compiled only for
//! `target_os = "espidf"`.

pub mod config;
pub mod drivers;
pub mod dsp;
pub mod error;
pub mod events;
pub mod tasks;

pub use error::{Error, Result};
pub use events::{BandMetrics, BandValue, Classification, Detection};
pub use tasks::detector::{CycleState, Detector, DetectorConfig};
