// TremorScope — Detection Events & Data Types

use core::fmt;

// ---------------------------------------------------------------------------
// Movement Classification
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Classification {
    #[default]
    None,
    Tremor,
    Dyskinesia,
}

impl Classification {
    /// Short label for indicator traces.
    pub fn label(&self) -> &'static str {
        match self {
            Self::None       => "none",
            Self::Tremor     => "tremor",
            Self::Dyskinesia => "dyskinesia",
        }
    }
}

// ---------------------------------------------------------------------------
// Band Metrics — one analysis window reduced to three numbers
// ---------------------------------------------------------------------------

/// Representative value of one frequency band.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BandValue {
    /// Peak (or summed) magnitude over the band.
    pub value: f32,
    /// Bin holding the largest in-band magnitude.
    pub bin: usize,
    /// Centre frequency of `bin` in Hz.
    pub frequency_hz: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BandMetrics {
    pub tremor: BandValue,
    pub dyskinesia: BandValue,
    /// Mean magnitude of the low-frequency reference slice.
    pub noise_floor: f32,
}

// ---------------------------------------------------------------------------
// Detection — result of one cycle, consumed by the indicator and the log
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub classification: Classification,
    /// Frequency of the dominant band's peak (0 when nothing was detected).
    pub frequency_hz: f32,
    /// Magnitude of the dominant band (0 when nothing was detected).
    pub magnitude: f32,
    pub threshold: f32,
    pub metrics: BandMetrics,
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.classification {
            Classification::Tremor => write!(
                f,
                "Tremor detected at {:.1} Hz (mag: {:.0})",
                self.frequency_hz, self.magnitude
            ),
            Classification::Dyskinesia => write!(
                f,
                "Dyskinesia detected at {:.1} Hz (mag: {:.0})",
                self.frequency_hz, self.magnitude
            ),
            Classification::None => write!(
                f,
                "No movement disorder detected (T: {:.0}, D: {:.0})",
                self.metrics.tremor.value, self.metrics.dyskinesia.value
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> BandMetrics {
        BandMetrics {
            tremor: BandValue { value: 62789.7, bin: 10, frequency_hz: 4.0625 },
            dyskinesia: BandValue { value: 313.7, bin: 13, frequency_hz: 5.28 },
            noise_floor: 4729.0,
        }
    }

    #[test]
    fn tremor_summary_reports_frequency_and_magnitude() {
        let d = Detection {
            classification: Classification::Tremor,
            frequency_hz: 4.0625,
            magnitude: 62789.7,
            threshold: 47290.0,
            metrics: metrics(),
        };
        assert_eq!(d.to_string(), "Tremor detected at 4.1 Hz (mag: 62790)");
    }

    #[test]
    fn none_summary_reports_both_band_values() {
        let d = Detection {
            classification: Classification::None,
            frequency_hz: 0.0,
            magnitude: 0.0,
            threshold: 1.0e6,
            metrics: metrics(),
        };
        assert_eq!(d.to_string(), "No movement disorder detected (T: 62790, D: 314)");
    }

    #[test]
    fn default_classification_is_none() {
        assert_eq!(Classification::default(), Classification::None);
        assert_eq!(Classification::Dyskinesia.label(), "dyskinesia");
    }
}
