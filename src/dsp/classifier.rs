// TremorScope — Adaptive-Threshold Classifier
//
// Single-winner rule over the two band values.  The threshold scales with
// the per-window noise floor, so no fixed calibration constant is needed.
// Strict inequalities throughout: an exact tie between the bands is reported
// as no detection even when both clear the threshold.

use crate::events::{BandMetrics, Classification, Detection};

/// Decide the classification for one window.
///
/// `threshold_factor` multiplies the noise floor (10 in production).
pub fn classify(metrics: &BandMetrics, threshold_factor: f32) -> Detection {
    let threshold = metrics.noise_floor * threshold_factor;
    let tremor = metrics.tremor;
    let dysk = metrics.dyskinesia;

    let (classification, dominant) = if tremor.value > dysk.value && tremor.value > threshold {
        (Classification::Tremor, Some(tremor))
    } else if dysk.value > tremor.value && dysk.value > threshold {
        (Classification::Dyskinesia, Some(dysk))
    } else {
        (Classification::None, None)
    };

    Detection {
        classification,
        frequency_hz: dominant.map_or(0.0, |b| b.frequency_hz),
        magnitude: dominant.map_or(0.0, |b| b.value),
        threshold,
        metrics: *metrics,
    }
}
