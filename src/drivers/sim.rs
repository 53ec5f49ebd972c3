// TremorScope — Simulated Peripherals
//
// Stand-ins for the accelerometer and LEDs used by the host build.  Samples
// are generated from the read count rather than wall-clock time, so a window
// is reproducible regardless of how the ticker is scheduled.

use std::f64::consts::TAU;

use crate::config::{SAMPLE_RATE_HZ, WHO_AM_I_EXPECTED};
use crate::drivers::{AccelSensor, Indicator};
use crate::error::Result;
use crate::events::Classification;

/// Sine tone on top of a constant offset, sampled at `SAMPLE_RATE_HZ`.
#[derive(Debug, Clone)]
pub struct SimulatedSensor {
    pub identity: u8,
    pub tone_hz: f32,
    pub amplitude: f32,
    pub offset: f32,
    reads: u64,
}

impl SimulatedSensor {
    pub fn new(tone_hz: f32, amplitude: f32) -> Self {
        Self {
            identity: WHO_AM_I_EXPECTED,
            tone_hz,
            amplitude,
            offset: 0.0,
            reads: 0,
        }
    }

    /// Constant reading only, e.g. gravity on a resting axis.
    pub fn constant(offset: f32) -> Self {
        Self { offset, ..Self::new(0.0, 0.0) }
    }

    pub fn reads(&self) -> u64 {
        self.reads
    }
}

impl AccelSensor for SimulatedSensor {
    fn identify(&mut self) -> Result<u8> {
        Ok(self.identity)
    }

    fn configure(&mut self) -> Result<()> {
        log::info!(
            "Simulated sensor: {:.2} Hz tone, amplitude {}, offset {}",
            self.tone_hz,
            self.amplitude,
            self.offset
        );
        Ok(())
    }

    fn read_sample(&mut self) -> Result<f32> {
        let t = self.reads as f64 / SAMPLE_RATE_HZ as f64;
        self.reads += 1;
        let phase = TAU * self.tone_hz as f64 * t;
        Ok(self.offset + self.amplitude * phase.sin() as f32)
    }
}

/// LED stand-in: tracks output levels and logs every change.
#[derive(Debug, Default)]
pub struct SimIndicator {
    levels: [bool; 3],
    updates: u32,
}

impl SimIndicator {
    /// `[tremor, dyskinesia, none]`
    pub fn levels(&self) -> [bool; 3] {
        self.levels
    }

    /// Number of `show`/`set_all` calls so far.
    pub fn updates(&self) -> u32 {
        self.updates
    }

    fn set(&mut self, levels: [bool; 3]) {
        if levels != self.levels {
            log::debug!("LEDs T:{} D:{} N:{}", levels[0] as u8, levels[1] as u8, levels[2] as u8);
        }
        self.levels = levels;
        self.updates += 1;
    }
}

impl Indicator for SimIndicator {
    fn show(&mut self, classification: Classification) -> Result<()> {
        self.set(match classification {
            Classification::Tremor     => [true, false, false],
            Classification::Dyskinesia => [false, true, false],
            Classification::None       => [false, false, true],
        });
        Ok(())
    }

    fn set_all(&mut self, on: bool) -> Result<()> {
        self.set([on; 3]);
        Ok(())
    }
}
