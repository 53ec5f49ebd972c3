// TremorScope — Peripheral Interfaces
//
// The detection core only talks to hardware through these traits.  The
// ESP-IDF implementations live next to them behind `target_os = "espidf"`;
// the simulated ones build everywhere and back the host binary and tests.

pub mod leds;
pub mod lsm6dsl;
pub mod sim;

use crate::error::Result;
use crate::events::Classification;

/// Register-level transport to a sensor (one I2C device address).
pub trait RegisterBus {
    fn write_register(&mut self, reg: u8, value: u8) -> Result<()>;

    /// Read `buf.len()` consecutive registers starting at `reg`.
    fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<()>;

    fn read_register(&mut self, reg: u8) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_registers(reg, &mut buf)?;
        Ok(buf[0])
    }
}

/// Accelerometer as seen by the acquisition loop.
pub trait AccelSensor {
    /// Device identity (WHO_AM_I).
    fn identify(&mut self) -> Result<u8>;

    /// Set output data rate and full scale.  Called once before sampling.
    fn configure(&mut self) -> Result<()>;

    /// One scalar sample.  Blocking; latency is a bus transaction.
    fn read_sample(&mut self) -> Result<f32>;
}

/// Three mutually exclusive detection outputs.
pub trait Indicator {
    /// Assert exactly the output for `classification`, deassert the others.
    fn show(&mut self, classification: Classification) -> Result<()>;

    /// Drive all three outputs together (startup and fatal blink).
    fn set_all(&mut self, on: bool) -> Result<()>;
}
